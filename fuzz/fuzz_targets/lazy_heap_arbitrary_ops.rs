#![no_main]

use keyqueue::ds::LazyHeapQueue;
use keyqueue::traits::AddressableQueue;
use libfuzzer_sys::fuzz_target;

// Fuzz arbitrary operation sequences on LazyHeapQueue
//
// Tests random sequences of insert_or_update, erase, pop, peek, rebuild and
// compaction changes, checking the index/heap invariants after each step.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut queue: LazyHeapQueue<u32, u32> = LazyHeapQueue::new();
    queue.set_compaction_factor(match data[0] % 3 {
        0 => None,
        n => Some(usize::from(n) * 2),
    });

    let mut idx = 1;
    while idx + 2 < data.len() {
        let op = data[idx] % 8;
        let key = u32::from(data[idx + 1] % 64);
        let value = u32::from(data[idx + 2]);

        match op {
            0 | 1 => {
                // insert_or_update
                let was_present = queue.contains(&key);
                assert_eq!(queue.insert_or_update(key, value), was_present);
                assert_eq!(queue.peek(&key), Ok(&value));
            },
            2 => {
                // erase
                let old_len = queue.len();
                if queue.erase(&key) {
                    assert_eq!(queue.len(), old_len - 1);
                    assert!(!queue.contains(&key));
                } else {
                    assert_eq!(queue.len(), old_len);
                }
            },
            3 => {
                // pop
                let old_len = queue.len();
                let expected = queue.top().map(|(k, v)| (*k, *v));
                match queue.pop() {
                    Ok(pair) => {
                        assert_eq!(Ok(pair), expected);
                        assert_eq!(queue.len(), old_len - 1);
                        assert!(!queue.contains(&pair.0));
                        if let Ok((_, next)) = queue.top() {
                            assert!(*next <= pair.1);
                        }
                    },
                    Err(_) => assert!(queue.is_empty()),
                }
            },
            4 => {
                // peek (read-only)
                assert_eq!(queue.peek(&key).is_ok(), queue.contains(&key));
            },
            5 => {
                // rebuild
                let old_len = queue.len();
                queue.rebuild();
                assert_eq!(queue.len(), old_len);
                assert_eq!(queue.heap_len(), queue.len());
            },
            6 => {
                // maybe_rebuild with factor 2
                let old_len = queue.len();
                queue.maybe_rebuild(2);
                assert_eq!(queue.len(), old_len);
            },
            7 => {
                // clear
                queue.clear();
                assert!(queue.is_empty());
                assert_eq!(queue.heap_len(), 0);
            },
            _ => unreachable!(),
        }

        assert!(queue.heap_len() >= queue.len());
        assert!(queue.check_invariants().is_ok());
        idx += 3;
    }
});
