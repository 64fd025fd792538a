use futures::executor::block_on;
use promisify::{
    promisify,
    promisify_all_with,
    Function,
    MatchOptions,
    Matcher,
    Object,
    Options,
    Pattern,
    Value,
};
use proptest::prelude::*;

fn calls_back(call: Vec<Value>) -> Function {
    Function::new("calls_back", 1, move |_this, args| {
        let (_, callback) = Function::split_callback(args);
        callback.expect("callback appended").invoke(call.clone())?;
        Ok(Value::Undefined)
    })
}

fn build(members: &[(String, bool)]) -> Object {
    let object = Object::new();
    for (index, (key, is_function)) in members.iter().enumerate() {
        let value = if *is_function {
            Value::from(calls_back(vec![Value::Null, Value::from(index)]))
        } else {
            Value::from(index)
        };
        object.set(key.clone(), value);
    }
    object
}

fn member_specs() -> impl Strategy<Value = Vec<(String, bool)>> {
    prop::collection::btree_map("[a-c.][a-cx]{0,4}", any::<bool>(), 0..10)
        .prop_map(|map| map.into_iter().collect())
}

fn patterns() -> impl Strategy<Value = Option<&'static str>> {
    prop::sample::select(vec![
        None,
        Some("*"),
        Some("a*"),
        Some("!b*"),
        Some("*x*"),
        Some(".*"),
    ])
}

proptest! {
    #[test]
    fn key_set_and_passthrough(
        members in member_specs(),
        pattern in patterns(),
        dot in any::<bool>()
    ) {
        let source = build(&members);
        let pattern = pattern.map(Pattern::from);
        let match_options = MatchOptions { dot, ..MatchOptions::default() };
        let options =
            Options { matcher: match_options, ..Options::default() };

        let result = promisify_all_with(
            &source.clone().into(),
            pattern.clone(),
            options,
        );
        let result = result.unwrap();
        let result = result.as_object().unwrap();
        prop_assert_eq!(result.keys(), source.keys());

        let matcher = Matcher::new(pattern.as_ref(), match_options).unwrap();
        for (key, original) in source.entries() {
            let adapted = result.get(&key).unwrap();
            let selected = matcher.is_match(&key)
                && original.as_function().is_some();
            if selected {
                let adapted = adapted.as_adapted().unwrap();
                prop_assert!(adapted
                    .function()
                    .ptr_eq(original.as_function().unwrap()));
            } else {
                prop_assert!(adapted.same(&original));
            }
        }
    }

    #[test]
    fn adapting_twice_keeps_keys(members in member_specs()) {
        let source = Value::from(build(&members));
        let once = promisify_all_with(&source, None, Options::default());
        let once = once.unwrap();
        let twice = promisify_all_with(&once, None, Options::default());
        let twice = twice.unwrap();
        prop_assert_eq!(
            once.as_object().unwrap().keys(),
            twice.as_object().unwrap().keys()
        );
    }

    #[test]
    fn resolution_arity(results in prop::collection::vec(any::<i32>(), 0..6)) {
        let results: Vec<Value> = results.into_iter().map(Value::from).collect();
        let mut call = vec![Value::Null];
        call.extend(results.iter().cloned());

        let adapted = promisify(calls_back(call), None);
        let value = block_on(adapted.call(vec![])).unwrap();
        match results.len() {
            0 => prop_assert_eq!(value, Value::Undefined),
            1 => prop_assert_eq!(&value, &results[0]),
            _ => prop_assert_eq!(value, Value::List(results)),
        }
    }

    #[test]
    fn rejection_is_the_error(message in "[a-z ]{1,12}", extra in any::<i32>()) {
        let error = Value::from(message);
        let adapted = promisify(
            calls_back(vec![error.clone(), Value::from(extra)]),
            None,
        );
        let rejection = block_on(adapted.call(vec![])).unwrap_err();
        prop_assert!(rejection.value().unwrap().same(&error));
    }
}
