#![no_main]

use keyqueue::builder::Strategy;
use keyqueue::PriorityQueue;
use libfuzzer_sys::fuzz_target;

// Differential fuzzing: both strategies behind the handle must agree on every
// observable result, including after take() and clone().
fuzz_target!(|data: &[u8]| {
    let mut lazy: PriorityQueue<u8, i8> = PriorityQueue::with_strategy(Strategy::LazyHeap);
    let mut eager: PriorityQueue<u8, i8> = PriorityQueue::with_strategy(Strategy::EagerTree);

    for chunk in data.chunks_exact(3) {
        let key = chunk[1] % 32;
        let value = chunk[2] as i8;

        match chunk[0] % 7 {
            0 | 1 => assert_eq!(
                lazy.insert_or_update(key, value),
                eager.insert_or_update(key, value)
            ),
            2 => assert_eq!(lazy.erase(&key), eager.erase(&key)),
            3 => assert_eq!(lazy.pop(), eager.pop()),
            4 => assert_eq!(lazy.peek(&key), eager.peek(&key)),
            5 => {
                if let (Ok(a), Ok(b)) = (lazy.take(), eager.take()) {
                    lazy = a;
                    eager = b;
                }
            },
            6 => {
                lazy = lazy.clone();
                eager = eager.clone();
            },
            _ => unreachable!(),
        }

        assert_eq!(lazy.len(), eager.len());
        assert_eq!(lazy.top(), eager.top());
    }

    assert_eq!(lazy.into_sorted_vec(), eager.into_sorted_vec());
});
