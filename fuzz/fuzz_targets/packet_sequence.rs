#![no_main]

use libfuzzer_sys::fuzz_target;
use synguard::automaton::{AutomatonState, PacketLabel};
use synguard::runner::steps;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let packets = PacketLabel::parse_list(input);

        // Token on the stack exactly while the session is active
        let mut it = steps(&packets);
        while let Some(record) = it.next() {
            assert_eq!(record.to, it.state());
            assert_eq!(
                it.stack().has_session(),
                it.state() == AutomatonState::Active
            );
            assert_eq!(record.is_attack, it.state() == AutomatonState::Trap);
        }
    }
});
