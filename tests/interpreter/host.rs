//! Host bridges: fscommand, ExternalInterface, intervals, time

use std::cell::RefCell;
use std::rc::Rc;

use super::{number, run_with};
use avm::bytecode::{ActionCode, BytecodeBuilder, PushValue};
use avm::{Avm, AvmConfig, ExternalHandler, IntervalCallback, Variable};

type CommandLog = Rc<RefCell<Vec<(String, String)>>>;

fn avm_with_log() -> (Avm, CommandLog) {
    let log: CommandLog = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    let mut avm = Avm::new();
    avm.set_fscommand(Box::new(move |name, value| {
        sink.borrow_mut().push((name.to_string(), value.to_string()));
        Variable::from("ack")
    }));
    (avm, log)
}

fn entry(name: &str, value: &str) -> (String, String) {
    (name.to_string(), value.to_string())
}

#[test]
fn test_get_url_strips_fscommand_prefix() {
    let (mut avm, log) = avm_with_log();
    let code = BytecodeBuilder::new()
        .get_url("FSCommand:showMenu", "main")
        .get_url("http://example.invalid", "_blank")
        .build();
    run_with(&mut avm, &code);
    assert_eq!(
        *log.borrow(),
        vec![
            entry("showMenu", "main"),
            entry("http://example.invalid", "_blank"),
        ]
    );
}

#[test]
fn test_get_url2_pops_url_and_target() {
    let (mut avm, log) = avm_with_log();
    let code = BytecodeBuilder::new()
        .push(&["FSCommand:quit".into(), "now".into()])
        .get_url2(0b1000_0000)
        .build();
    run_with(&mut avm, &code);
    assert_eq!(*log.borrow(), vec![entry("quit", "now")]);
}

#[test]
fn test_external_interface_call_forwards_strings_and_json() {
    let (mut avm, log) = avm_with_log();
    // ExternalInterface.call("save", "slot1")
    let code = BytecodeBuilder::new()
        .push(&[
            "slot1".into(),
            "save".into(),
            PushValue::Integer(2),
            "flash.external.ExternalInterface".into(),
        ])
        .op(ActionCode::GetVariable)
        .push_one("call")
        .op(ActionCode::CallMethod)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), Variable::from("ack"));

    // ExternalInterface.call("stats", {n: 5})
    let code = BytecodeBuilder::new()
        .push(&["n".into(), PushValue::Integer(5), PushValue::Integer(1)])
        .op(ActionCode::InitObject)
        .push(&[
            "stats".into(),
            PushValue::Integer(2),
            "flash.external.ExternalInterface".into(),
        ])
        .op(ActionCode::GetVariable)
        .push_one("call")
        .op(ActionCode::CallMethod)
        .build();
    run_with(&mut avm, &code);

    assert_eq!(
        *log.borrow(),
        vec![entry("save", "slot1"), entry("stats", r#"{"n":5}"#)]
    );
}

#[test]
fn test_root_goto_and_play() {
    let (mut avm, log) = avm_with_log();
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(12), PushValue::Integer(1), "_root".into()])
        .op(ActionCode::GetVariable)
        .push_one("gotoAndPlay")
        .op(ActionCode::CallMethod)
        .build();
    run_with(&mut avm, &code);
    assert_eq!(*log.borrow(), vec![entry("gotoAndPlay", "12")]);
}

/// Clock advanced by hand; intervals fire when their period has elapsed
#[derive(Default)]
struct ManualClock {
    now: Rc<RefCell<u64>>,
    intervals: Vec<(u32, u64, u64, IntervalCallback)>,
}

impl ExternalHandler for ManualClock {
    fn set_interval(&mut self, interval_ms: u32, callback: IntervalCallback) -> u32 {
        let id = self.intervals.len() as u32 + 1;
        let now = *self.now.borrow();
        self.intervals
            .push((id, interval_ms as u64, now + interval_ms as u64, callback));
        id
    }

    fn clear_interval(&mut self, id: u32) {
        self.intervals.retain(|(i, ..)| *i != id);
    }

    fn get_time(&self) -> u64 {
        *self.now.borrow()
    }

    fn take_due_intervals(&mut self) -> Vec<IntervalCallback> {
        let now = *self.now.borrow();
        let mut due = Vec::new();
        for (_, period, next, callback) in &mut self.intervals {
            if *next <= now {
                due.push(callback.clone());
                *next = now + *period;
            }
        }
        due
    }
}

#[test]
fn test_set_interval_from_bytecode() {
    let now = Rc::new(RefCell::new(1000));
    let mut avm = Avm::new();
    avm.set_external_handler(Box::new(ManualClock {
        now: now.clone(),
        ..Default::default()
    }));

    // ticks = 0; function tick(step) { ticks = ticks + step; }
    let body = BytecodeBuilder::new()
        .push(&["ticks".into(), "ticks".into()])
        .op(ActionCode::GetVariable)
        .push_one("step")
        .op(ActionCode::GetVariable)
        .op(ActionCode::Add2)
        .op(ActionCode::SetVariable)
        .build();
    let mut code = BytecodeBuilder::new();
    code.push(&["ticks".into(), PushValue::Integer(0)])
        .op(ActionCode::SetVariable);
    code.define_function("tick", &["step"], &body)
        .op(ActionCode::Pop);
    // id = setInterval(tick, 100, 5)
    code.push(&[PushValue::Integer(5), PushValue::Integer(100), "tick".into()])
        .op(ActionCode::GetVariable)
        .push(&[PushValue::Integer(3), "setInterval".into()])
        .op(ActionCode::CallFunction)
        .op(ActionCode::Return);
    let id = run_with(&mut avm, &code.build());
    assert_eq!(id, number(1.0));

    assert_eq!(avm.run_due_intervals().unwrap(), 0);
    *now.borrow_mut() += 100;
    assert_eq!(avm.run_due_intervals().unwrap(), 1);
    *now.borrow_mut() += 100;
    assert_eq!(avm.run_due_intervals().unwrap(), 1);
    assert_eq!(avm.get_variable("ticks"), number(10.0));

    let clear = BytecodeBuilder::new()
        .push(&[PushValue::Integer(1), PushValue::Integer(1), "clearInterval".into()])
        .op(ActionCode::CallFunction)
        .build();
    run_with(&mut avm, &clear);
    *now.borrow_mut() += 100;
    assert_eq!(avm.run_due_intervals().unwrap(), 0);
}

#[test]
fn test_get_time_counts_from_handler_install() {
    let now = Rc::new(RefCell::new(5000));
    let mut avm = Avm::new();
    avm.set_external_handler(Box::new(ManualClock {
        now: now.clone(),
        ..Default::default()
    }));
    *now.borrow_mut() += 250;
    let code = BytecodeBuilder::new()
        .op(ActionCode::GetTime)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), number(250.0));
}

#[test]
fn test_register_class_from_bytecode() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut avm = Avm::new();
    avm.set_register_class(Box::new(move |name, _class| {
        sink.borrow_mut().push(name.to_string());
    }));
    let code = BytecodeBuilder::new()
        .push(&[PushValue::Integer(0)])
        .op(ActionCode::InitObject)
        .push(&["Button".into(), PushValue::Integer(2), "Object".into()])
        .op(ActionCode::GetVariable)
        .push_one("registerClass")
        .op(ActionCode::CallMethod)
        .build();
    run_with(&mut avm, &code);
    assert_eq!(*seen.borrow(), vec!["Button".to_string()]);
}

#[test]
fn test_trace_is_harmless() {
    let mut avm = Avm::new();
    let code = BytecodeBuilder::new()
        .push_one("hello")
        .op(ActionCode::Trace)
        .op(ActionCode::Trace)
        .push_one(1)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), number(1.0));
}

#[test]
fn test_stage_follows_config() {
    let config = AvmConfig::from_json(r#"{"stage_width": 1280, "stage_height": 720}"#).unwrap();
    let mut avm = Avm::with_config(config);
    let code = BytecodeBuilder::new()
        .push_one("Stage.height")
        .op(ActionCode::GetVariable)
        .op(ActionCode::Return)
        .build();
    assert_eq!(run_with(&mut avm, &code), number(720.0));
}
