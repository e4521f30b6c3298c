use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Type of jobs to be executed by the threadpool
type Job = Box<dyn FnOnce() + Send + 'static>;

/// Simple threadpool, joining all threads on drop.
///
/// Heavily inspired by the one in the Rust book:
/// https://doc.rust-lang.org/book/ch20-02-multithreaded.html
pub struct ThreadPool {
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
}

impl ThreadPool {
    /// Create a new ThreadPool with `size` threads.
    ///
    /// `size` must be greater than 0.
    pub fn new(size: usize) -> ThreadPool {
        assert!(size > 0, "ThreadPool size must be greater than 0");

        let (sender, receiver) = mpsc::channel();
        let receiver = Arc::new(Mutex::new(receiver));

        let workers = (0..size)
            .map(|_| Worker::new(Arc::clone(&receiver)))
            .collect();

        ThreadPool {
            workers,
            sender: Some(sender),
        }
    }

    /// Queue a task to run on the threadpool when a worker is available
    pub fn execute<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let job = Box::new(f);
        self.sender.as_ref().unwrap().send(job).unwrap();
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for worker in &mut self.workers {
            if let Some(thread) = worker.handle.take() {
                thread.join().unwrap();
            }
        }
    }
}

/// Worker struct, holding a thread handle
struct Worker {
    handle: Option<thread::JoinHandle<()>>,
}

impl Worker {
    /// Create a new worker that executes jobs from the given receiver until
    /// the sending side is closed
    fn new(receiver: Arc<Mutex<mpsc::Receiver<Job>>>) -> Worker {
        let handle = thread::spawn(move || loop {
            let message = receiver.lock().unwrap().recv();
            match message {
                Ok(job) => job(),
                Err(_) => break,
            }
        });
        Worker {
            handle: Some(handle),
        }
    }
}
