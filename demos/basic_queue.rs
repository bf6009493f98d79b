//! Example exercising both queue strategies through the owning handle.
//!
//! Run with: cargo run --example basic_queue

use std::fmt::Display;
use std::hash::Hash;

use keyqueue::builder::{QueueBuilder, Strategy};
use keyqueue::order::{Compare, Greater, Less};
use keyqueue::PriorityQueue;

type Queue<C = Greater> = PriorityQueue<i32, String, C>;

fn scenario_pairs() -> Vec<(i32, String)> {
    [(0, "a"), (1, "z"), (2, "f"), (10, "axx"), (-2, "exh")]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}

fn print_pairs() -> Vec<(i32, String)> {
    [(0, "c"), (1, "b"), (5, "A"), (4, "a"), (2, "z"), (3, "X")]
        .into_iter()
        .map(|(k, v)| (k, v.to_string()))
        .collect()
}

/// Pops both queues in lockstep and compares every top entry.
fn identical<K, V, C>(a: &mut PriorityQueue<K, V, C>, b: &mut PriorityQueue<K, V, C>) -> bool
where
    K: Eq + Hash + Ord + Clone,
    V: Eq + Clone,
    C: Compare<V>,
{
    if a.len() != b.len() {
        return false;
    }
    while a.is_empty() == Ok(false) {
        if a.top() != b.top() {
            return false;
        }
        let _ = a.pop();
        let _ = b.pop();
    }
    true
}

fn check_copy<C: Compare<String>>(mut original: Queue<C>) -> bool {
    let mut copy = original.clone();
    identical(&mut original, &mut copy)
}

fn check_order<C: Compare<String>>(queue: Queue<C>) -> bool {
    let Ok(n) = queue.len() else { return false };
    let Ok(drained) = queue.into_sorted_vec() else { return false };
    drained.len() == n && drained.windows(2).all(|w| !C::less(&w[1].1, &w[0].1))
}

fn check_take<C: Compare<String>>(mut queue: Queue<C>) -> bool {
    let n = queue.len();
    match queue.take() {
        Ok(moved) => !queue.is_valid() && moved.len() == n,
        Err(_) => false,
    }
}

fn check_clone_from<C: Compare<String>>(queue: Queue<C>) -> bool {
    let mut original = queue;
    let mut copy: Queue<C> = PriorityQueue::new();
    copy.clone_from(&original);
    identical(&mut original, &mut copy)
}

fn print_drained<K: Display, V: Display>(title: &str, pairs: Vec<(K, V)>) {
    println!("{title}");
    for (key, value) in pairs {
        println!("   {key}: {value}");
    }
    println!();
}

fn run(strategy: Strategy) {
    println!("=== {strategy:?} ===\n");

    let scenario = || -> Queue {
        QueueBuilder::new()
            .strategy(strategy)
            .build_from(scenario_pairs())
    };

    let queue = scenario();
    println!("   top:            {:?}", queue.top());
    println!("   len:            {:?}", queue.len());
    println!("   copy identical: {}", check_copy(scenario()));
    println!("   order holds:    {}", check_order(scenario()));
    println!("   take leaves source invalid: {}", check_take(scenario()));
    println!("   clone_from identical:       {}", check_clone_from(scenario()));
    println!();

    let greatest: Queue<Greater> = QueueBuilder::new()
        .strategy(strategy)
        .build_from(print_pairs());
    if let Ok(pairs) = greatest.into_sorted_vec() {
        print_drained("   greatest first:", pairs);
    }

    let least: Queue<Less> = QueueBuilder::new()
        .strategy(strategy)
        .build_from(print_pairs());
    if let Ok(pairs) = least.into_sorted_vec() {
        print_drained("   least first:", pairs);
    }
}

fn main() {
    run(Strategy::LazyHeap);
    run(Strategy::EagerTree);
}
