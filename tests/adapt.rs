use futures::{executor::block_on, FutureExt};
use promisify::{args, promisify, shape, Adapted, Function, Rejection, Value};
use std::{cell::RefCell, rc::Rc};

fn calls_back_with(results: Vec<Value>) -> Function {
    Function::new("calls_back", 1, move |_this, args| {
        let (_, callback) = Function::split_callback(args);
        let mut call = vec![Value::Null];
        call.extend(results.iter().cloned());
        callback.expect("callback appended").invoke(call)?;
        Ok(Value::Undefined)
    })
}

fn multiple_args() -> Function {
    Function::new("multiple_args", 4, |_this, args| {
        let (args, callback) = Function::split_callback(args);
        let mut call = vec![Value::Null];
        call.extend(args);
        callback.expect("callback appended").invoke(call)?;
        Ok(Value::Undefined)
    })
}

#[test]
fn single_result_resolves_to_it() {
    let adapted = promisify(calls_back_with(args!["x"]), None);
    assert_eq!(block_on(adapted.call(vec![])).unwrap(), Value::from("x"));
}

#[test]
fn no_result_resolves_to_undefined() {
    let adapted = promisify(calls_back_with(vec![]), None);
    assert_eq!(block_on(adapted.call(vec![])).unwrap(), Value::Undefined);
}

#[test]
fn multiple_results_resolve_to_list_in_order() {
    let adapted = promisify(multiple_args(), None);
    let result = block_on(adapted.call(args![11, 22, 33])).unwrap();
    assert_eq!(result, Value::List(args![11, 22, 33]));
}

#[test]
fn trailing_function_argument_is_data() {
    let noop = Function::new("noop", 0, |_, _| Ok(Value::Undefined));
    let adapted = promisify(multiple_args(), None);
    let result =
        block_on(adapted.call(args![123, noop.clone(), "three"])).unwrap();
    let list = result.as_list().unwrap();
    assert_eq!(list.len(), 3);
    assert!(list[1].same(&Value::from(noop)));
}

#[test]
fn callback_error_rejects_with_it() {
    let failure = Value::error_msg("boom");
    let failing = {
        let failure = failure.clone();
        Function::new("failing", 1, move |_this, args| {
            let (_, callback) = Function::split_callback(args);
            callback.expect("callback appended").invoke(vec![
                failure.clone(),
                Value::from("ignored"),
            ])?;
            Ok(Value::Undefined)
        })
    };

    let rejection =
        block_on(promisify(failing, None).call(vec![])).unwrap_err();
    assert!(rejection.value().unwrap().same(&failure));
    assert_eq!(rejection.to_string(), "boom");
}

#[test]
fn falsy_error_values_do_not_reject() {
    let falsy =
        [Value::Undefined, Value::Null, false.into(), 0.into(), "".into()];
    for error in falsy {
        let function = Function::new("falsy", 1, move |_this, args| {
            let (_, callback) = Function::split_callback(args);
            callback
                .expect("callback appended")
                .invoke(vec![error.clone(), "ok".into()])?;
            Ok(Value::Undefined)
        });
        let result = block_on(promisify(function, None).call(vec![]));
        assert_eq!(result.unwrap(), Value::from("ok"));
    }
}

#[test]
fn sync_function_return_value_resolves() {
    let read_sync = Function::new("read_sync", 1, |_this, args| {
        let path = args[0].as_str().unwrap_or_default();
        Ok(Value::from(format!("contents of {}", path)))
    });
    let adapted = promisify(read_sync, None);
    let result = block_on(adapted.call(args!["package.json"])).unwrap();
    assert_eq!(result, Value::from("contents of package.json"));
}

#[test]
fn sync_function_error_rejects() {
    let read_sync = Function::new("read_sync", 1, |_this, args| {
        let path = args[0].as_str().unwrap_or_default();
        let contents = std::fs::read(path)?;
        Ok(Value::bytes(contents))
    });
    let adapted = promisify(read_sync, None);
    let rejection =
        block_on(adapted.call(args!["/definitely/not/here.json"])).unwrap_err();
    let error = rejection.value().unwrap().as_error().unwrap();
    let io_error = error.downcast_ref::<std::io::Error>().unwrap();
    assert_eq!(io_error.kind(), std::io::ErrorKind::NotFound);
}

#[test]
fn panic_rejects() {
    let panicking =
        Function::new("panicking", 0, |_, _| panic!("wrapped panic"));
    let rejection =
        block_on(promisify(panicking, None).call(vec![])).unwrap_err();
    assert!(rejection.is_panic());
    assert!(rejection.to_string().contains("wrapped panic"));
}

#[test]
fn returning_the_callback_waits_for_it() {
    let stored = Rc::new(RefCell::new(None::<Function>));
    let function = {
        let stored = stored.clone();
        Function::new("chained", 1, move |_this, args| {
            let (_, callback) = Function::split_callback(args);
            let callback = callback.expect("callback appended");
            *stored.borrow_mut() = Some(callback.clone());
            Ok(Value::Function(callback))
        })
    };

    let mut deferred = promisify(function, None).call(vec![]);
    assert!((&mut deferred).now_or_never().is_none());

    let callback = stored.borrow_mut().take().unwrap();
    callback.invoke(args![Value::Null, "late"]).unwrap();
    assert_eq!(block_on(deferred).unwrap(), Value::from("late"));
}

#[test]
fn async_callback_settles_later() {
    let stored = Rc::new(RefCell::new(None::<Function>));
    let function = {
        let stored = stored.clone();
        Function::new("later", 1, move |_this, args| {
            let (_, callback) = Function::split_callback(args);
            *stored.borrow_mut() = callback;
            Ok(Value::Undefined)
        })
    };

    let mut deferred = promisify(function, None).call(vec![]);
    assert!((&mut deferred).now_or_never().is_none());

    let callback = stored.borrow_mut().take().unwrap();
    callback.invoke(args![Value::Null, 1, 2]).unwrap();
    assert_eq!(block_on(deferred).unwrap(), Value::List(args![1, 2]));
}

#[test]
fn first_settlement_wins() {
    let function = Function::new("twice", 1, |_this, args| {
        let (_, callback) = Function::split_callback(args);
        let callback = callback.expect("callback appended");
        callback.invoke(args![Value::Null, "first"])?;
        callback.invoke(args![Value::error_msg("second"), "second"])?;
        Ok(Value::from("returned"))
    });
    let result = block_on(promisify(function, None).call(vec![]));
    assert_eq!(result.unwrap(), Value::from("first"));
}

#[test]
fn return_value_settles_before_callback() {
    let stored = Rc::new(RefCell::new(None::<Function>));
    let function = {
        let stored = stored.clone();
        Function::new("returns", 1, move |_this, args| {
            let (_, callback) = Function::split_callback(args);
            *stored.borrow_mut() = callback;
            Ok(Value::from("sync"))
        })
    };

    let deferred = promisify(function, None).call(vec![]);
    let callback = stored.borrow_mut().take().unwrap();
    callback.invoke(args![Value::Null, "async"]).unwrap();
    assert_eq!(block_on(deferred).unwrap(), Value::from("sync"));
}

#[test]
fn dropped_callback_cancels() {
    let function = Function::new("forgetful", 1, |_, _| Ok(Value::Undefined));
    let rejection =
        block_on(promisify(function, None).call(vec![])).unwrap_err();
    assert!(matches!(rejection, Rejection::Cancelled));
}

#[test]
fn receiver_follows_call_site() {
    let whoami = Function::new("whoami", 0, |this, _| Ok(this.clone()));
    let adapted = promisify(whoami, None);
    let receiver = Value::from("the receiver");
    let result = block_on(adapted.call_method(&receiver, vec![])).unwrap();
    assert_eq!(result, receiver);
}

#[test]
fn bound_receiver_takes_precedence() {
    let whoami = Function::new("whoami", 0, |this, _| Ok(this.clone()));
    let adapted = Adapted::bound(whoami, "bound".into(), None);
    let result =
        block_on(adapted.call_method(&"call site".into(), vec![])).unwrap();
    assert_eq!(result, Value::from("bound"));
    assert_eq!(adapted.receiver(), Some(Value::from("bound")));
}

#[test]
fn callback_is_appended_after_all_arguments() {
    let seen = Rc::new(RefCell::new(0));
    let function = {
        let seen = seen.clone();
        Function::new("counts", 2, move |_this, args| {
            *seen.borrow_mut() = args.len();
            assert!(matches!(args.last(), Some(Value::Function(_))));
            Ok(Value::Null)
        })
    };
    let adapted = promisify(function, None);
    let result = block_on(adapted.call(args![1, 2, 3])).unwrap();
    assert_eq!(result, Value::Null);
    assert_eq!(*seen.borrow(), 4);
}

#[test]
fn shape_collapses_results() {
    assert_eq!(shape(vec![]), Value::Undefined);
    assert_eq!(shape(args![5]), Value::from(5));
    assert_eq!(shape(args![1, "two"]), Value::List(args![1, "two"]));
}
