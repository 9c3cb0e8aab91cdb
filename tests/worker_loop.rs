//! End-to-end worker-thread behavior: queue discipline, the stop
//! handshake, and read-only sharing of a populated store.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use geopipe_core::{SparseStore, Task};

/// Runs tasks from `incoming` until the stop sentinel, returning how
/// many units of work were done.
fn run_worker(incoming: mpsc::Receiver<Task>) -> usize {
    let mut done = 0;
    while let Ok(task) = incoming.recv() {
        if task.invoke() {
            break;
        }
        done += 1;
    }
    done
}

#[test]
fn worker_runs_queued_work_in_order_then_stops() {
    struct TileBuffer {
        cells: Vec<u8>,
    }

    let (queue, incoming) = mpsc::channel();
    let (seq, observed) = mpsc::channel();

    let worker = thread::spawn(move || run_worker(incoming));

    for i in 0..5u32 {
        let seq = seq.clone();
        queue.send(Task::new(move || seq.send(i).unwrap())).unwrap();
    }

    // A move-only payload travels through the queue by move; nothing
    // here is cloneable.
    let buffer = TileBuffer {
        cells: vec![0u8; 16],
    };
    let seq_for_buffer = seq.clone();
    queue
        .send(Task::new(move || {
            seq_for_buffer
                .send(1000 + buffer.cells.len() as u32)
                .unwrap();
        }))
        .unwrap();

    queue.send(Task::stop()).unwrap();

    // Work queued behind the sentinel must never run. The worker may
    // already have hung up, so these sends are best-effort.
    for _ in 0..2 {
        let seq = seq.clone();
        let _ = queue.send(Task::new(move || seq.send(99).unwrap()));
    }

    assert_eq!(worker.join().unwrap(), 6);

    drop(seq);
    let order: Vec<u32> = observed.iter().collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4, 1016]);
}

#[test]
fn stop_alone_terminates_an_idle_worker() {
    let (queue, incoming) = mpsc::channel();
    let worker = thread::spawn(move || run_worker(incoming));
    queue.send(Task::stop()).unwrap();
    assert_eq!(worker.join().unwrap(), 0);
}

#[test]
fn resolver_workers_share_a_frozen_store() {
    let ids = [3u64, 64, 900, 70_000];

    // Populate single-threaded, then freeze behind an Arc for readers.
    let mut locations: SparseStore<u64, (i32, i32)> = SparseStore::with_grow_increment(1024);
    for &id in &ids {
        locations.set(id, (id as i32, -(id as i32)));
    }
    let locations = Arc::new(locations);

    let (results, resolved) = mpsc::channel();
    let workers: Vec<_> = (0..2)
        .map(|_| {
            let (queue, incoming) = mpsc::channel();
            (queue, thread::spawn(move || run_worker(incoming)))
        })
        .collect();

    for (i, &id) in ids.iter().enumerate() {
        let store = Arc::clone(&locations);
        let results = results.clone();
        let task = Task::new(move || results.send((id, store.get(id))).unwrap());
        workers[i % workers.len()].0.send(task).unwrap();
    }
    // An id nobody wrote resolves to an error, through the same path.
    let store = Arc::clone(&locations);
    let missing = results.clone();
    workers[0]
        .0
        .send(Task::new(move || {
            missing.send((5, store.get(5))).unwrap();
        }))
        .unwrap();
    drop(results);

    let mut done = 0;
    for (queue, worker) in workers {
        queue.send(Task::stop()).unwrap();
        done += worker.join().unwrap();
    }
    assert_eq!(done, ids.len() + 1);

    for (id, result) in resolved.iter() {
        if id == 5 {
            assert!(result.is_err());
        } else {
            assert_eq!(result, Ok((id as i32, -(id as i32))));
        }
    }
}
