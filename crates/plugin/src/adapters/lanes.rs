use crossbeam_channel::{SendError, Sender, unbounded};
use std::collections::HashMap;

/// Runs jobs on one thread per key.
///
/// Jobs with the same key run in order; a slow job only holds up its own key.
/// Each lane owns a clone of the handler. Dropping a lane (or the whole set)
/// lets its thread finish queued work and exit.
pub struct Lanes<J, F> {
    handler: F,
    lanes: HashMap<String, Sender<J>>,
}

impl<J, F> Lanes<J, F>
where
    J: Send + 'static,
    F: Fn(&str, J) + Clone + Send + 'static,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            lanes: HashMap::new(),
        }
    }

    pub fn dispatch(&mut self, key: &str, job: J) {
        let job = match self.lanes.get(key) {
            Some(tx) => match tx.send(job) {
                Ok(()) => return,
                // lane thread is gone; start a fresh one
                Err(SendError(job)) => job,
            },
            None => job,
        };

        let tx = self.spawn(key);
        // the receiver lives in the thread we just spawned
        let _ = tx.send(job);
        self.lanes.insert(key.to_string(), tx);
    }

    pub fn close(&mut self, key: &str) {
        self.lanes.remove(key);
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    fn spawn(&self, key: &str) -> Sender<J> {
        let (tx, rx) = unbounded::<J>();
        let handler = self.handler.clone();
        let key = key.to_string();
        std::thread::spawn(move || {
            for job in rx {
                handler(&key, job);
            }
        });
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::time::Duration;

    #[test]
    fn blocked_lane_does_not_hold_up_others() {
        let (release_tx, release_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = unbounded::<String>();
        let mut lanes = Lanes::new(move |key: &str, wait: bool| {
            if wait {
                release_rx.recv().unwrap();
            }
            done_tx.send(key.to_string()).unwrap();
        });

        lanes.dispatch("slow", true);
        lanes.dispatch("fast", false);

        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), "fast");
        release_tx.send(()).unwrap();
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)).unwrap(), "slow");
    }

    #[test]
    fn same_key_runs_in_order() {
        let (done_tx, done_rx) = unbounded::<u32>();
        let mut lanes = Lanes::new(move |_: &str, n: u32| {
            std::thread::sleep(Duration::from_millis(u64::from(5 - n)));
            done_tx.send(n).unwrap();
        });

        for n in 0..5 {
            lanes.dispatch("dial", n);
        }
        assert_eq!(lanes.lane_count(), 1);

        let got: Vec<u32> = (0..5)
            .map(|_| done_rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        assert_eq!(got, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn closed_lane_is_restarted_on_demand() {
        let (done_tx, done_rx) = unbounded::<u32>();
        let mut lanes = Lanes::new(move |_: &str, n: u32| {
            done_tx.send(n).unwrap();
        });

        lanes.dispatch("key", 1);
        lanes.close("key");
        assert_eq!(lanes.lane_count(), 0);
        lanes.dispatch("key", 2);

        let mut got: Vec<u32> = (0..2)
            .map(|_| done_rx.recv_timeout(Duration::from_secs(5)).unwrap())
            .collect();
        got.sort();
        assert_eq!(got, vec![1, 2]);
    }
}
