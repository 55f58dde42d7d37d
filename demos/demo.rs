use lib::guarded::GuardedValue;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const WRITER_WORKERS: u32 = 8;
const READER_WORKERS: u32 = 4;
const TOTAL_WRITES: u32 = 100000;
const WRITES_PER_WORKER: u32 = TOTAL_WRITES / WRITER_WORKERS;

fn main() {
    let shared = Arc::new(GuardedValue::new(0u32));

    if TOTAL_WRITES % WRITER_WORKERS != 0 {
        panic!("WRITES_PER_WORKER must be integer number");
    }

    let writers = (0..WRITER_WORKERS)
        .map(|idx| {
            let shared = shared.clone();
            thread::spawn(move || {
                let mut i = 0;
                while i < WRITES_PER_WORKER {
                    shared.with_access(|value| *value += 1);
                    i += 1;
                }

                println!("#{} Write Worker finished!", idx);
            })
        })
        .collect::<Vec<_>>();

    let readers = (0..READER_WORKERS)
        .map(|idx| {
            let shared = shared.clone();
            thread::spawn(move || {
                loop {
                    let value = *shared.acquire();
                    if value == TOTAL_WRITES {
                        println!("#{} Read Worker finished!. Value: {}", idx, value);
                        break;
                    }

                    thread::sleep(Duration::from_millis(50));
                }
            })
        })
        .collect::<Vec<_>>();

    readers
        .into_iter()
        .for_each(|handle| handle.join().unwrap());
    writers
        .into_iter()
        .for_each(|handle| handle.join().unwrap());

    println!("#{:?} VALUE.", shared.acquire());
}
