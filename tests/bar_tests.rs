//! Tests for bar counters, variables, configuration and rendering.

use pbar::bar::vars::{BYTES, SI_BYTES_PREFIX};
use pbar::bar::DEFAULT_WIDTH;
use pbar::element::element_fn;
use pbar::{Bar, Error};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod common;
use common::helpers::*;

#[test]
fn test_new_bar() {
    let bar = Bar::with_registry(100, create_registry());
    assert_eq!(bar.total(), 100);
    assert_eq!(bar.current(), 0);
    assert!(!bar.is_finished());
    assert!(!bar.is_started());
    assert!(bar.err().is_none());
    assert!(bar.start_time().is_none());
}

#[test]
fn test_add_past_total_finishes() {
    let bar = create_test_bar(100, "{{counters . }}");
    bar.add(150);
    assert_eq!(bar.current(), 150);
    assert!(bar.is_finished());
}

#[test]
fn test_inc_reaches_total() {
    let bar = create_test_bar(3, "{{counters . }}");
    bar.inc().inc();
    assert!(!bar.is_finished());
    bar.inc();
    assert!(bar.is_finished());
}

#[test]
fn test_finished_is_permanent() {
    let bar = create_test_bar(100, "{{counters . }}");
    bar.set_current(100);
    assert!(bar.is_finished());

    bar.set_current(10);
    bar.set_total(1000);
    bar.add(-5);
    assert!(bar.is_finished());
    assert_eq!(bar.current(), 5);
}

#[test]
fn test_lowering_total_finishes() {
    let bar = create_test_bar(100, "{{counters . }}");
    bar.set_current(50);
    bar.set_total(40);
    assert!(bar.is_finished());
}

#[test]
fn test_empty_total_starts_finished() {
    assert!(Bar::new(0).is_finished());
    assert!(Bar::with_registry(-1, create_registry()).is_finished());
    assert!(!Bar::new(1).is_finished());
}

#[test]
fn test_start_new() {
    let bar = Bar::start_new(10);
    assert!(bar.is_started());
    assert!(!bar.is_finished());
    assert!(bar.err().is_none());
}

#[test]
fn test_with_template() {
    let bar = Bar::with_template(10, r#"{{counters . "%s of %s"}}"#);
    bar.set_width(TEST_WIDTH).add(4);
    assert_eq!(bar.string().trim_end(), "4 of 10");

    let broken = Bar::with_template(10, "{{counters . ");
    assert!(broken.err().is_some_and(|e| e.is_configuration()));
}

#[test]
fn test_explicit_finish() {
    let bar = create_test_bar(100, "{{status . }}");
    bar.finish().finish();
    assert!(bar.is_finished());
    assert_eq!(bar.current(), 0);
    assert_eq!(bar.string().trim_end(), "done");
}

#[test]
fn test_concurrent_increments() {
    let bar = Arc::new(create_test_bar(8000, "{{counters . }}"));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bar = Arc::clone(&bar);
            thread::spawn(move || {
                for _ in 0..1000 {
                    bar.inc();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(bar.current(), 8000);
    assert!(bar.is_finished());
}

#[test]
fn test_variables() {
    let bar = Bar::with_registry(10, create_registry());
    bar.set("name", "copy")
        .set("count", 3)
        .set("verbose", true)
        .set("timeout", Duration::from_secs(2));

    assert_eq!(bar.get_string("name"), "copy");
    assert_eq!(bar.get_int("count"), 3);
    assert!(bar.get_bool("verbose"));
    assert_eq!(bar.get_duration("timeout"), Duration::from_secs(2));

    // Absent or mistyped values fall back to zero values.
    assert_eq!(bar.get_string("missing"), "");
    assert_eq!(bar.get_int("name"), 0);
    assert!(!bar.get_bool("count"));
    assert_eq!(bar.get_duration("verbose"), Duration::ZERO);
    assert!(bar.get("missing").is_none());

    bar.set("name", "move");
    assert_eq!(bar.get_string("name"), "move");
}

#[test]
fn test_format_units() {
    let bar = Bar::with_registry(10, create_registry());
    assert_eq!(bar.format(2048), "2048");

    bar.set(BYTES, true);
    let binary = bar.format(2048);
    assert!(binary.starts_with("2.00") && binary.ends_with("KiB"), "{}", binary);

    bar.set(SI_BYTES_PREFIX, true);
    let decimal = bar.format(2000);
    assert!(decimal.starts_with("2.00") && decimal.ends_with("kB"), "{}", decimal);
}

#[test]
fn test_width_resolution() {
    let bar = Bar::with_registry(10, create_registry());
    bar.set_width(40);
    assert_eq!(bar.width(), 40);

    bar.set_max_width(30);
    assert_eq!(bar.width(), 30);

    bar.set_max_width(0);
    assert_eq!(bar.width(), 40);

    // Falls back to the terminal, or the default when there is none.
    bar.set_width(0);
    assert!(bar.width() > 0);
    bar.set_max_width(DEFAULT_WIDTH / 2);
    assert!(bar.width() <= DEFAULT_WIDTH / 2);
}

#[test]
fn test_render_pads_to_width() {
    let bar = create_test_bar(100, "{{counters . }}");
    bar.add(20);
    let (line, width) = bar.render().unwrap();
    assert_eq!(width, TEST_WIDTH);
    assert_eq!(line.trim_end(), "20 / 100");
    assert_cell_width(&line, TEST_WIDTH);
    assert_eq!(bar.string(), line);
    assert_eq!(bar.to_string(), line);
}

#[test]
fn test_render_with_variables() {
    let bar = create_test_bar(100, r#"{{string . "prefix"}}{{counters . "%s/%s"}}{{string . "suffix"}}"#);
    bar.set("prefix", "copy ").set("suffix", " files").add(42);
    assert_eq!(bar.string().trim_end(), "copy 42/100 files");
}

#[test]
fn test_render_adaptive_line_is_exact_width() {
    let bar = create_test_bar(100, "{{counters . }} {{bar . }} {{percent . }}");
    bar.add(50);
    let line = bar.string();
    assert_cell_width(&line, TEST_WIDTH);
    assert!(line.starts_with("50 / 100 ["), "{}", line);
    assert!(line.ends_with("] 50.00%"), "{}", line);
}

#[test]
fn test_default_template_is_bound() {
    let bar = Bar::with_registry(100, create_registry());
    bar.set_width(60).set("prefix", "get ").add(20);
    let line = bar.string();
    assert!(bar.is_started());
    assert!(line.starts_with("get 20 / 100 ["), "{}", line);
    assert!(line.contains("20.00%"), "{}", line);
    assert_cell_width(&line, 60);
}

#[test]
fn test_render_ids_increment_and_reset_on_start() {
    let bar = create_test_bar(10, r#"{{cycle . "a" "b" "c"}}"#);
    let frames: Vec<String> = (0..4).map(|_| bar.string().trim_end().to_string()).collect();
    assert_eq!(frames, ["a", "b", "c", "a"]);

    bar.start();
    assert_eq!(bar.string().trim_end(), "a");
}

#[test]
fn test_concurrent_renders_get_unique_ids() {
    let registry = create_registry();
    registry.register_element("id", element_fn(|state, _args| Ok(state.id().to_string())));
    let bar = Arc::new(Bar::with_registry(10, registry));
    bar.set_width(TEST_WIDTH);
    bar.set_template("{{id . }}").unwrap();
    bar.start();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let bar = Arc::clone(&bar);
            thread::spawn(move || {
                (0..50)
                    .map(|_| bar.string().trim_end().parse::<u64>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "render id {} seen twice", id);
        }
    }
    assert_eq!(ids, (1..=200).collect::<HashSet<u64>>());
}

#[test]
fn test_invalid_template_is_sticky() {
    let bar = create_test_bar(10, "{{counters . }}");
    let err = bar.set_template("{{nope . }}").unwrap_err();
    assert!(err.is_configuration());
    assert!(bar.err().is_some_and(|e| e.is_configuration()));

    assert!(bar.render().unwrap_err().is_configuration());
    assert_eq!(bar.string(), "");

    bar.set_template("{{counters . }}").unwrap();
    assert!(bar.err().is_none());
    assert_eq!(bar.string().trim_end(), "0 / 10");
}

#[test]
fn test_start_clears_error_and_binds_default() {
    let bar = create_test_bar(10, "{{counters . }}");
    assert!(bar.set_template("{{nope . }}").is_err());
    bar.start();
    assert!(bar.err().is_none());
    assert!(bar.string().contains("0 / 10"));
}

#[test]
fn test_render_error_is_recorded_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let registry = create_registry();
    let counter = Arc::clone(&calls);
    registry.register_element(
        "flaky",
        element_fn(move |_state, _args| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(Error::Render("source went away".into()))
        }),
    );
    let bar = Bar::with_registry(10, registry);
    bar.set_template("{{flaky . }}").unwrap();
    bar.start();

    assert!(bar.render().unwrap_err().is_render());
    assert!(bar.render().unwrap_err().is_render());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(bar.err().is_some_and(|e| e.is_render()));
}

#[test]
fn test_element_panic_is_contained() {
    let registry = create_registry();
    registry.register_element(
        "explode",
        element_fn(|_state, _args| -> pbar::Result<String> { panic!("kaboom") }),
    );
    let bar = Bar::with_registry(10, registry);
    bar.set_template("{{explode . }}").unwrap();
    bar.start();

    let err = bar.render().unwrap_err();
    assert!(err.is_render());
    assert!(err.to_string().contains("render panic"), "{}", err);
    assert!(err.to_string().contains("kaboom"), "{}", err);
    assert_eq!(bar.string(), "");

    // The bar stays usable.
    bar.inc();
    assert_eq!(bar.current(), 1);
}

#[test]
fn test_set_err() {
    let bar = create_test_bar(10, "{{counters . }}");
    bar.set_err(Error::Render("stopped".into()));
    assert_eq!(bar.render().unwrap_err().to_string(), "render error: stopped");
    bar.start();
    assert!(bar.render().is_ok());
}

#[test]
fn test_start_on_finished_bar() {
    let bar = create_test_bar(10, "{{status . }}");
    bar.set_current(10);
    let before = bar.start_time();
    bar.start();
    assert!(bar.is_finished());
    assert_eq!(bar.start_time(), before);
    assert_eq!(bar.string().trim_end(), "done");
}

#[test]
fn test_reload_template_picks_up_new_elements() {
    let registry = create_registry();
    registry.register_element("stage", element_fn(|_state, _args| Ok("old".to_string())));
    let bar = Bar::with_registry(10, Arc::clone(&registry));
    bar.set_width(TEST_WIDTH);
    bar.set_template("{{stage . }}").unwrap();
    assert_eq!(bar.string().trim_end(), "old");

    registry.register_element("stage", element_fn(|_state, _args| Ok("new".to_string())));
    bar.set_template("{{stage . }}").unwrap();
    assert_eq!(bar.string().trim_end(), "old");

    bar.reload_template("{{stage . }}").unwrap();
    assert_eq!(bar.string().trim_end(), "new");
}

#[test]
fn test_reload_template_error_is_sticky() {
    let bar = create_test_bar(10, "{{counters . }}");
    assert!(bar.reload_template("{{missing . }}").unwrap_err().is_configuration());
    assert!(bar.err().is_some());
    assert_eq!(bar.string(), "");
}

#[test]
fn test_proxy_reader_counts_bytes() {
    let bar = Arc::new(create_test_bar(1024, "{{counters . }}"));
    let data = vec![7u8; 600];
    let mut reader = bar.proxy_reader(data.as_slice());

    let mut chunk = [0u8; 100];
    let n = reader.read(&mut chunk).unwrap();
    assert_eq!(n, 100);
    assert_eq!(bar.current(), 100);
    assert!(bar.get_bool(BYTES));

    let mut rest = Vec::new();
    reader.read_to_end(&mut rest).unwrap();
    assert_eq!(rest.len(), 500);
    assert_eq!(bar.current(), 600);
    assert!(!bar.is_finished());
    assert!(Arc::ptr_eq(reader.bar(), &bar));
}

#[test]
fn test_proxy_writer_counts_bytes() {
    let bar = Arc::new(create_test_bar(10, "{{counters . }}"));
    let mut writer = bar.proxy_writer(Vec::new());
    writer.write_all(b"hello").unwrap();
    writer.write_all(b" world").unwrap();
    writer.flush().unwrap();

    assert_eq!(bar.current(), 11);
    assert!(bar.is_finished());
    assert!(bar.get_bool(BYTES));
    assert_eq!(writer.into_inner(), b"hello world");
}

#[test]
fn test_proxy_switches_counters_to_bytes() {
    let bar = Arc::new(create_test_bar(4096, "{{counters . }}"));
    let mut writer = bar.proxy_writer(std::io::sink());
    writer.write_all(&[0u8; 2048]).unwrap();
    let line = bar.string();
    assert!(line.contains("KiB"), "{}", line);
}
