use cogex_codegen::{
    BrowserPrinter, Component, DesktopPrinter, MouseComponent, Printer, write_phase,
};
use cogex_core::EmitPhase;
use cogex_experiment::{
    ForceEndRoutine, LoopKind, MouseParams, RoutineContext, SaveMouseState,
};

fn trial_loop() -> RoutineContext {
    RoutineContext::new("trial").with_loop("trials", LoopKind::TrialHandler)
}

fn render(component: &MouseComponent, phase: EmitPhase, printer: &dyn Printer) -> String {
    let mut out = printer.writer(0);
    write_phase(component, phase, &trial_loop(), printer, &mut out);
    out.into_string()
}

fn final_never() -> MouseComponent {
    MouseComponent::new(MouseParams {
        save_mouse_state: SaveMouseState::Final,
        force_end_routine_on_press: ForceEndRoutine::Never,
        clickable: String::new(),
        ..MouseParams::default()
    })
}

fn on_click_valid() -> MouseComponent {
    MouseComponent::new(MouseParams {
        save_mouse_state: SaveMouseState::OnClick,
        force_end_routine_on_press: ForceEndRoutine::ValidClick,
        clickable: "target".to_string(),
        save_params_clickable: "name".to_string(),
        ..MouseParams::default()
    })
}

#[test]
fn final_sample_without_clickables() {
    let mouse = final_never();

    assert_eq!(
        render(&mouse, EmitPhase::Declare, &DesktopPrinter),
        "mouse = event.Mouse(win=win)\nx, y = [None, None]\n"
    );
    assert_eq!(
        render(&mouse, EmitPhase::Declare, &BrowserPrinter),
        "mouse = new core.Mouse({win: psychoJS.window});\n"
    );

    assert_eq!(
        render(&mouse, EmitPhase::RoutineStart, &DesktopPrinter),
        "# setup some lists for storing info about the mouse\n\
         # until a click is received\n\
         gotValidClick = False\n"
    );

    assert_eq!(render(&mouse, EmitPhase::EachFrame, &DesktopPrinter), "");
    assert_eq!(render(&mouse, EmitPhase::EachFrame, &BrowserPrinter), "");

    assert_eq!(
        render(&mouse, EmitPhase::RoutineEnd, &DesktopPrinter),
        "# store data for trials (TrialHandler)\n\
         x, y = mouse.getPos()\n\
         buttons = mouse.getPressed()\n\
         mouse.time = trialClock.getTime()\n\
         trials.addData('mouse.x', x)\n\
         trials.addData('mouse.y', y)\n\
         trials.addData('mouse.leftButton', buttons[0])\n\
         trials.addData('mouse.midButton', buttons[1])\n\
         trials.addData('mouse.rightButton', buttons[2])\n"
    );
    assert_eq!(
        render(&mouse, EmitPhase::RoutineEnd, &BrowserPrinter),
        "// store data for trials (TrialHandler)\n\
         {\n\
         \x20 let [x, y] = mouse.getPos();\n\
         \x20 my.buttons = mouse.getPressed();\n\
         \x20 mouse.time = trialClock.getTime();\n\
         \x20 psychoJS.experiment.addData('mouse.x', x);\n\
         \x20 psychoJS.experiment.addData('mouse.y', y);\n\
         \x20 psychoJS.experiment.addData('mouse.leftButton', my.buttons[0]);\n\
         \x20 psychoJS.experiment.addData('mouse.midButton', my.buttons[1]);\n\
         \x20 psychoJS.experiment.addData('mouse.rightButton', my.buttons[2]);\n\
         }\n"
    );
}

#[test]
fn on_click_ending_on_valid_click() {
    let mouse = on_click_valid();

    let expected = "\
# *mouse* updates
if t >= 0.0 and mouse.status == NOT_STARTED:
    # keep track of start time/frame for later
    mouse.tStart = t
    mouse.frameNStart = frameN
    mouse.status = STARTED
    # if button is down already this ISN'T a new click
    prevButtonState = mouse.getPressed()
if mouse.status == STARTED and t >= mouse.tStart + 1.0:
    mouse.status = STOPPED
if mouse.status == STARTED:
    # only update if started and not stopped!
    buttons = mouse.getPressed()
    if buttons != prevButtonState:
        # button state changed
        prevButtonState = buttons
        if sum(buttons) > 0:
            # state changed to a new click
            x, y = mouse.getPos()
            mouse.x.append(x)
            mouse.y.append(y)
            mouse.leftButton.append(buttons[0])
            mouse.midButton.append(buttons[1])
            mouse.rightButton.append(buttons[2])
            mouse.time.append(trialClock.getTime())
            # check if the mouse was inside our 'clickable' objects
            for obj in [target]:
                if obj.contains(mouse):
                    gotValidClick = True
                    mouse.clicked_name.append(obj.name)
            # abort routine on response
            if gotValidClick:
                continueRoutine = False
";
    assert_eq!(render(&mouse, EmitPhase::EachFrame, &DesktopPrinter), expected);

    let js = render(&mouse, EmitPhase::EachFrame, &BrowserPrinter);
    assert!(js.contains("if (t >= 0.0 && mouse.status === PsychoJS.Status.NOT_STARTED) {\n"));
    assert!(js.contains("\n  my.prevButtonState = mouse.getPressed();\n"));
    assert!(js.contains("if (!my.buttons.every((e, i) => e === my.prevButtonState[i])) {\n"));
    assert!(js.contains("      for (const obj of [target]) {\n        if (obj.contains(mouse)) {\n"));
    assert!(js.contains("      if (my.gotValidClick) {\n        continueRoutine = false;\n      }\n"));
    assert_eq!(js.matches('{').count(), js.matches('}').count());
    assert!(js.ends_with("  }\n}\n"));

    let mut expected = String::from("# store data for trials (TrialHandler)\n");
    for c in ["x", "y", "leftButton", "midButton", "rightButton", "time", "clicked_name"] {
        expected += &format!("if len(mouse.{c}):\n    trials.addData('mouse.{c}', mouse.{c}[0])\n");
    }
    assert_eq!(render(&mouse, EmitPhase::RoutineEnd, &DesktopPrinter), expected);
}

#[test]
fn unset_stop_value_skips_stop_test() {
    for stop in [None, Some("None"), Some(""), Some("-1")] {
        for save in SaveMouseState::ALL {
            for force_end in ForceEndRoutine::ALL {
                let mouse = MouseComponent::new(MouseParams {
                    save_mouse_state: *save,
                    force_end_routine_on_press: *force_end,
                    stop_val: stop.map(str::to_string),
                    ..MouseParams::default()
                });
                for printer in [&DesktopPrinter as &dyn Printer, &BrowserPrinter] {
                    let code = render(&mouse, EmitPhase::EachFrame, printer);
                    assert!(!code.contains("STOPPED"), "{stop:?} {save} {force_end}");
                }
            }
        }
    }
}

#[test]
fn condition_windows_are_parenthesised() {
    let mouse = MouseComponent::new(MouseParams {
        start_type: "condition".parse().unwrap(),
        start_val: Some("$key_resp.keys == 'space'".to_string()),
        stop_type: "duration (frames)".parse().unwrap(),
        stop_val: Some("60".to_string()),
        save_mouse_state: SaveMouseState::EveryFrame,
        force_end_routine_on_press: ForceEndRoutine::Never,
        ..MouseParams::default()
    });
    let code = render(&mouse, EmitPhase::EachFrame, &DesktopPrinter);
    assert!(code.contains(
        "if (key_resp.keys == 'space') and mouse.status == NOT_STARTED:\n"
    ));
    assert!(code.contains(
        "if mouse.status == STARTED and frameN >= mouse.frameNStart + 60:\n"
    ));
    // every frame: buttons read unconditionally, no change detection
    assert!(code.contains("    buttons = mouse.getPressed()\n    x, y = mouse.getPos()\n"));
    assert!(!code.contains("prevButtonState = buttons"));
}

#[test]
fn old_clicks_count_when_new_clicks_only_is_off() {
    let mut params = on_click_valid().params().clone();
    params.new_clicks_only = false;
    let mouse = MouseComponent::new(params);
    assert!(render(&mouse, EmitPhase::EachFrame, &DesktopPrinter)
        .contains("    prevButtonState = [0, 0, 0]\n"));
    assert!(render(&mouse, EmitPhase::EachFrame, &BrowserPrinter)
        .contains("  my.prevButtonState = [0, 0, 0];\n"));
}

#[test]
fn routine_start_is_idempotent_and_restores_indent() {
    let mouse = on_click_valid();
    let ctx = trial_loop();
    for printer in [&DesktopPrinter as &dyn Printer, &BrowserPrinter] {
        for phase in EmitPhase::ALL {
            let mut first = printer.writer(2);
            write_phase(&mouse, phase, &ctx, printer, &mut first);
            assert_eq!(first.level(), 2);

            let mut second = printer.writer(2);
            write_phase(&mouse, phase, &ctx, printer, &mut second);
            assert_eq!(first.as_str(), second.as_str());
        }
    }
}

#[test]
fn clicked_attributes_get_their_own_lists() {
    let mut params = on_click_valid().params().clone();
    params.save_params_clickable = "name, text".to_string();
    params.clickable = "[target, foil]".to_string();
    let mouse = MouseComponent::new(params);

    let start = render(&mouse, EmitPhase::RoutineStart, &BrowserPrinter);
    assert!(start.contains("mouse.clicked_name = [];\nmouse.clicked_text = [];\n"));
    assert!(start.ends_with("my.gotValidClick = false;\n"));

    let frame = render(&mouse, EmitPhase::EachFrame, &DesktopPrinter);
    assert!(frame.contains("for obj in [target, foil]:"));
    let hit_indent = " ".repeat(4 * 5);
    assert!(frame.contains(&format!(
        "{hit_indent}mouse.clicked_name.append(obj.name)\n{hit_indent}mouse.clicked_text.append(obj.text)\n"
    )));
    assert_eq!(mouse.name(), "mouse");
}
