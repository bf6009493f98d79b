#![no_main]

use keyqueue::ds::EagerTreeQueue;
use keyqueue::order::Less;
use keyqueue::traits::AddressableQueue;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on EagerTreeQueue (min-queue)
//
// The tree must never hold more entries than there are live keys.
fuzz_target!(|data: &[u8]| {
    let mut queue: EagerTreeQueue<u16, u8, Less> = EagerTreeQueue::new();

    for chunk in data.chunks_exact(3) {
        let key = u16::from(chunk[1] % 48);
        let value = chunk[2];

        match chunk[0] % 5 {
            0 | 1 => {
                let was_present = queue.contains(&key);
                assert_eq!(queue.insert_or_update(key, value), was_present);
                assert_eq!(queue.peek(&key), Ok(&value));
            },
            2 => {
                let was_present = queue.contains(&key);
                assert_eq!(queue.erase(&key), was_present);
                assert!(!queue.contains(&key));
            },
            3 => match queue.pop() {
                Ok((popped, value)) => {
                    assert!(!queue.contains(&popped));
                    if let Ok((_, next)) = queue.top() {
                        assert!(*next >= value);
                    }
                },
                Err(_) => assert!(queue.is_empty()),
            },
            4 => {
                let ordered: Vec<u8> = queue.iter_ordered().map(|(_, v)| *v).collect();
                assert!(ordered.windows(2).all(|w| w[0] <= w[1]));
            },
            _ => unreachable!(),
        }

        assert_eq!(queue.tree_len(), queue.len());
        assert!(queue.check_invariants().is_ok());
    }
});
