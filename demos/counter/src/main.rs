//! Counter - Minimal stateblock example
//!
//! Demonstrates the core pattern end to end:
//! - Blocks: named state slices with actions, effects, and selectors
//! - Composition: blocks merged into one root block
//! - Store: dispatch loop with the effects middleware in front

use std::sync::Arc;

use stateblock::prelude::*;

// ============================================================================
// Blocks - independent slices with their own actions and selectors
// ============================================================================

fn counter_block() -> Block {
    BlockBuilder::new("counter", Value::from(0))
        .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
        .action("add", |s, args| {
            Value::from(s.as_int().unwrap_or(0) + args[0].as_int().unwrap_or(0))
        })
        .selector("value", |s| s.clone())
        .build()
}

fn message_block() -> Block {
    BlockBuilder::new("message", Value::from("hello"))
        .action("set", |_, args| args[0].clone())
        .selector("text", |s| s.clone())
        .build()
}

fn notifier_block() -> Block {
    BlockBuilder::new("notifier", Value::Null)
        .effects(|cx: &Context| {
            let channel = cx.expect::<String>("channel");
            let mut table = EffectTable::new();
            table.insert(
                "notify".to_string(),
                Arc::new(move |args: &[Value]| {
                    tracing::info!(
                        channel = %channel,
                        message = ?args.first(),
                        "notification effect"
                    );
                }) as EffectHandler,
            );
            table
        })
        .build()
}

// ============================================================================
// Main - compose, wire the middleware chain, dispatch
// ============================================================================

fn main() {
    tracing_subscriber::fmt().init();

    let root = CompositionBuilder::new("root")
        .block("counter", counter_block())
        .block("message", message_block())
        .block("notifier", notifier_block())
        .selector("summary", |s| {
            Value::from(format!(
                "{} ({})",
                s.get("message").and_then(Value::as_str).unwrap_or(""),
                s.get("counter").and_then(Value::as_int).unwrap_or(0),
            ))
        })
        .build();

    let context = Context::new().with("channel", "stdout".to_string());
    let mut chain: ComposedMiddleware<ActionDescriptor> = ComposedMiddleware::new();
    chain.add(EffectsMiddleware::new(&root, &context));
    chain.add(LoggingMiddleware::verbose());

    let mut store = StoreWithMiddleware::from_block(&root, chain);

    let counter = root.actions().at_path(&["counter"]).unwrap().clone();
    let message = root.actions().at_path(&["message"]).unwrap().clone();
    let notifier = root.actions().at_path(&["notifier"]).unwrap().clone();

    store.dispatch(counter.creator("inc").act());
    store.dispatch(counter.creator("add").with([Value::from(10)]));
    store.dispatch(message.creator("set").with([Value::from("counted")]));
    store.dispatch(notifier.creator("notify").with([Value::from("done")]));

    let summary = root
        .select()
        .eval_at(&["summary"], store.state())
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    println!("{summary}");
}
