//! Cross-thread console integration tests
//!
//! Exercises the full producer/owner/consumer triangle: foreign threads
//! push events and tasks through a handle, the owner thread pumps, and a
//! consumer thread blocks on submitted lines.

use std::thread;
use std::time::Duration;

use ocon::console::Console;
use ocon::{Config, Event, Key, Modifiers};

fn pump_until<F: Fn(&Console) -> bool>(console: &mut Console, pred: F) {
    for _ in 0..200 {
        assert!(console.pump(Duration::from_millis(10)));
        if pred(console) {
            return;
        }
    }
    panic!("condition not reached within pump budget");
}

#[test]
fn producer_thread_output_lands_in_scrollback() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    let producer = thread::spawn(move || {
        for i in 0..20 {
            handle.append_output(format!("worker line {}", i));
        }
    });

    pump_until(&mut console, |c| c.screen().store().len() == 20);
    producer.join().unwrap();

    let newest: String = console
        .screen()
        .store()
        .entries()
        .next()
        .unwrap()
        .raw()
        .iter()
        .collect();
    assert_eq!(newest, "worker line 19");
}

#[test]
fn consumer_thread_receives_submitted_line() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    let consumer = {
        let handle = console.handle();
        thread::spawn(move || handle.get_line_blocking())
    };

    handle.push_event(Event::Text("run tests".into()));
    handle.push_event(Event::Key { key: Key::Return, mods: Modifiers::empty() });
    pump_until(&mut console, |c| !c.screen().store().is_empty());

    assert_eq!(consumer.join().unwrap(), Some("run tests".into()));
}

#[test]
fn shutdown_from_foreign_thread_unblocks_consumer() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    let consumer = {
        let handle = console.handle();
        thread::spawn(move || handle.get_line_blocking())
    };

    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        handle.shutdown();
    });

    // The owner observes shutdown and closes the rendezvous.
    let mut stopped = false;
    for _ in 0..200 {
        if !console.pump(Duration::from_millis(10)) {
            stopped = true;
            break;
        }
    }
    assert!(stopped);
    assert_eq!(consumer.join().unwrap(), None);
    closer.join().unwrap();
}

#[test]
fn line_submitted_before_shutdown_is_still_delivered() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    handle.push_event(Event::Text("last words".into()));
    handle.push_event(Event::Key { key: Key::Return, mods: Modifiers::empty() });
    pump_until(&mut console, |c| !c.screen().store().is_empty());

    handle.shutdown();
    assert!(!console.pump(Duration::from_secs(5)));

    // The queued line survives shutdown; only then comes the sentinel.
    assert_eq!(handle.get_line_blocking(), Some("last words".into()));
    assert_eq!(handle.get_line_blocking(), None);
}

#[test]
fn pushes_after_shutdown_are_dropped() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    handle.shutdown();
    assert!(!console.pump(Duration::from_millis(10)));

    handle.append_output("too late");
    handle.push_event(Event::Text("ghost".into()));
    assert!(!console.pump(Duration::from_millis(10)));
    assert!(console.screen().store().is_empty());
    assert!(console.screen().prompt().input().is_empty());
}

#[test]
fn handles_are_cloneable_across_threads() {
    let mut console = Console::new(&Config::default());
    let handle = console.handle();

    let mut producers = Vec::new();
    for t in 0..4 {
        let handle = handle.clone();
        producers.push(thread::spawn(move || {
            for i in 0..10 {
                handle.append_output(format!("thread {} line {}", t, i));
            }
        }));
    }
    for p in producers {
        p.join().unwrap();
    }

    pump_until(&mut console, |c| c.screen().store().len() == 40);
}
