use super::*;

use std::sync::Arc;
use std::thread;

#[test]
fn offer_until_full_then_reject() {
    let buffer = JobBuffer::new(3);
    assert!(buffer.is_empty());

    for i in 0..3 {
        buffer.offer(i).expect("room in buffer");
    }
    assert!(buffer.is_full());
    assert_eq!(buffer.len(), 3);

    let rejected = buffer.offer(99).expect_err("buffer is full");
    assert_eq!(rejected, 99);
}

#[test]
fn take_up_to_preserves_fifo_and_stops_on_empty() {
    let buffer = JobBuffer::new(5);
    for c in ['a', 'b', 'c'] {
        buffer.offer(c).expect("offer");
    }

    let cases: &[(usize, &[char])] = &[(2, &['a', 'b']), (10, &['c']), (4, &[])];
    for (max, expected) in cases {
        let got = buffer.take_up_to(*max);
        assert_eq!(got.as_slice(), *expected, "take_up_to({max})");
    }
    assert!(buffer.is_empty());
}

#[test]
fn take_up_to_zero_is_empty() {
    let buffer = JobBuffer::new(2);
    buffer.offer(1).expect("offer");
    assert!(buffer.take_up_to(0).is_empty());
    assert_eq!(buffer.len(), 1);
}

#[test]
fn draining_frees_full_capacity() {
    let buffer = JobBuffer::new(4);
    for i in 0..4 {
        buffer.offer(i).expect("offer");
    }
    assert!(buffer.offer(4).is_err());

    let drained = buffer.take_up_to(buffer.capacity());
    assert_eq!(drained, vec![0, 1, 2, 3]);
    buffer.offer(4).expect("room after drain");
}

#[test]
fn concurrent_producers_lose_nothing() {
    let buffer = Arc::new(JobBuffer::new(1000));

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let buffer = Arc::clone(&buffer);
            thread::spawn(move || {
                for j in 0..250 {
                    buffer.offer(t * 1000 + j).expect("capacity covers all producers");
                }
            })
        })
        .collect();

    for h in handles {
        h.join().expect("producer finished");
    }

    let mut items = buffer.take_up_to(usize::MAX);
    assert_eq!(items.len(), 1000);
    items.sort_unstable();
    items.dedup();
    assert_eq!(items.len(), 1000);
}
