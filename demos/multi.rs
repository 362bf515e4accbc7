//! Example showing several bars updated from worker threads

use color_eyre::Result;
use pbar::bar::vars::BYTES;
use pbar::progress::ProgressBuilder;
use rand::Rng;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TEMPLATE: &str = r#"{{string . "prefix" | cyan}}{{counters . "%s/%s"}} {{bar . "[" "=" ">" " " "]"}} {{percent . | green}} {{rtime . "ETA %s"}}"#;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let progress = ProgressBuilder::new()
        .width(0)
        .template(TEMPLATE)
        .refresh_interval(Duration::from_millis(100))
        .build();

    // A byte counter next to a few plain item counters
    let download = progress.add_bar(64 * 1024 * 1024);
    download.set("prefix", "fetch  ").set(BYTES, true);

    let mut workers = Vec::new();
    for i in 1..=3 {
        let bar = progress.add_bar(200 * i);
        bar.set("prefix", format!("job {i}  "));
        workers.push(thread::spawn(move || {
            let mut rng = rand::rng();
            while !bar.is_finished() {
                bar.inc();
                thread::sleep(Duration::from_millis(rng.random_range(2..10)));
            }
        }));
    }
    workers.push(thread::spawn(move || {
        while !download.is_finished() {
            download.add(256 * 1024);
            thread::sleep(Duration::from_millis(15));
        }
    }));

    progress.start();
    for worker in workers {
        if worker.join().is_err() {
            eprintln!("A worker panicked");
        }
    }
    progress.finish_all().await;

    println!("All jobs complete!");

    Ok(())
}
