use std::sync::mpsc;

use scoped_threadpool::Pool;

/// Drives `reader(index)` sequentially on the calling thread until it returns
/// `None` (the reader contract's "empty document terminates the pass"), handing
/// each document to an idle pool worker for `process`. Returns one accumulator
/// per document rather than one per worker thread: `scoped_threadpool` does not
/// expose a stable worker id the way the source's custom `ThreadPool` does, and
/// since every merge in this crate is a commutative sum, a per-document
/// accumulator merged afterwards is equivalent to a per-worker one. Grounded on
/// the teacher's `calculate_ngrams_threaded` (`scoped_threadpool::Pool` sized
/// from `num_cpus`, results collected over an `mpsc::channel`, `pool.scoped`
/// fencing the borrow of captured locals).
pub fn scan<T, R, P>(num_threads: usize, reader: R, process: P) -> Vec<T>
where
    T: Send + 'static,
    R: Fn(usize) -> Option<String>,
    P: Fn(&str, usize) -> T + Sync,
{
    let mut pool = Pool::new(num_threads.max(1) as u32);
    let (tx, rx) = mpsc::channel();
    pool.scoped(|scope| {
        let mut index = 0usize;
        loop {
            let doc = match reader(index) {
                Some(d) if !d.is_empty() => d,
                _ => break,
            };
            let tx = tx.clone();
            let process = &process;
            scope.execute(move || {
                let result = process(&doc, index);
                tx.send(result).expect("harness result channel closed");
            });
            index += 1;
        }
    });
    drop(tx);
    rx.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn empty_reader_yields_no_accumulators() {
        let results: Vec<u32> = scan(2, |_| None, |_doc, _idx| 0u32);
        assert!(results.is_empty());
    }

    #[test]
    fn every_document_is_processed_exactly_once() {
        let docs = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let seen = Arc::new(AtomicUsize::new(0));
        let reader = {
            let docs = docs.clone();
            move |i: usize| docs.get(i).cloned()
        };
        let seen_clone = Arc::clone(&seen);
        let results = scan(4, reader, move |doc, _idx| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
            doc.len()
        });
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        let mut lens: Vec<usize> = results;
        lens.sort_unstable();
        assert_eq!(lens, vec![1, 1, 1]);
    }

    #[test]
    fn deterministic_regardless_of_thread_count() {
        let docs: Vec<String> = (0..50).map(|i| format!("doc-{i}")).collect();
        for threads in [1, 8] {
            let docs = docs.clone();
            let reader = move |i: usize| docs.get(i).cloned();
            let mut results: Vec<usize> = scan(threads, reader, |doc, _idx| doc.len());
            results.sort_unstable();
            assert_eq!(results.len(), 50);
        }
    }
}
