//! End-to-end composition scenarios driven through the reference store.

use stateblock::prelude::*;

fn counter() -> Block {
    BlockBuilder::new("counter", Value::from(0))
        .action("inc", |s, _| Value::from(s.as_int().unwrap_or(0) + 1))
        .action("add", |s, args| {
            Value::from(s.as_int().unwrap_or(0) + args[0].as_int().unwrap_or(0))
        })
        .selector("value", |s| s.clone())
        .build()
}

fn message() -> Block {
    BlockBuilder::new("message", Value::from("hello"))
        .action("set", |_, args| args[0].clone())
        .selector("text", |s| s.clone())
        .build()
}

#[test]
fn counter_block_end_to_end() {
    let block = counter();

    let inc = block.actions().creator("inc").act();
    assert_eq!(inc.type_name(), "counter/inc");
    assert!(!inc.has_payload());

    assert_eq!(block.reduce(Some(&Value::from(0)), &inc), Value::from(1));
    assert_eq!(
        block.reduce(
            Some(&Value::from(1)),
            &block.actions().creator("add").with([Value::from(10)])
        ),
        Value::from(11)
    );
}

#[test]
fn composition_updates_one_slice_and_shares_the_rest() {
    let root = CompositionBuilder::new("root")
        .block("counter", counter())
        .block("message", message())
        .build();

    let mut store = Store::from_block(&root);
    assert_eq!(
        store.state(),
        &Value::from_entries([
            ("counter", Value::from(0)),
            ("message", Value::from("hello")),
        ])
    );

    let before = store.state().clone();
    let inc = root
        .actions()
        .at_path(&["counter"])
        .unwrap()
        .creator("inc")
        .act();
    assert!(store.dispatch(inc));

    assert_eq!(store.state().get("counter"), Some(&Value::from(1)));
    assert_eq!(store.state().get("message"), Some(&Value::from("hello")));
    assert!(!Value::same(&before, store.state()));
    // The untouched slice is the same value, not a copy.
    assert!(Value::same(
        before.get("message").unwrap(),
        store.state().get("message").unwrap()
    ));
}

#[test]
fn unrelated_actions_leave_the_root_untouched() {
    let root = CompositionBuilder::new("root")
        .block("counter", counter())
        .block("message", message())
        .build();
    let mut store = Store::from_block(&root);
    let before = store.state().clone();

    assert!(!store.dispatch(ActionDescriptor::new("nowhere/noop")));
    assert!(Value::same(&before, store.state()));
}

#[test]
fn selectors_survive_two_levels_of_nesting() {
    let inner = CompositionBuilder::new("inner")
        .block("counter", counter())
        .build();
    let outer = CompositionBuilder::new("outer")
        .block("inner", inner)
        .build();

    let mut store = Store::from_block(&outer);
    let inc = outer
        .actions()
        .at_path(&["inner", "counter"])
        .unwrap()
        .creator("inc");
    for _ in 0..42 {
        store.dispatch(inc.act());
    }

    assert_eq!(
        outer
            .select()
            .eval_at(&["inner", "counter", "value"], store.state()),
        Some(Value::from(42))
    );
}

#[test]
fn lifting_a_raw_selector_through_two_mapping_levels() {
    let tree = SelectorTree::leaf(|s: &Value| s.get("count").cloned().unwrap_or(Value::Null));
    let lifted = lift(
        &lift(
            &tree,
            projection(|s: &Value| s.get("inner").cloned().unwrap_or(Value::Null)),
        ),
        projection(|s: &Value| s.get("outer").cloned().unwrap_or(Value::Null)),
    );

    let root = Value::from_entries([(
        "outer",
        Value::from_entries([("inner", Value::from_entries([("count", Value::from(42))]))]),
    )]);
    assert_eq!(lifted.eval(&root), Some(Value::from(42)));
}
