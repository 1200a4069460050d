use cogex_cache::{Atom, BUTTON_CHANNELS, STANDARD_CHANNELS, clicked_channel, intern_ident};
use cogex_core::{ComponentStatus, EmitPhase, TargetRuntime};
use cogex_experiment::{
    ForceEndRoutine, MouseParams, RoutineContext, SaveMouseState, StartType, StopType,
};
use tracing::warn;

use crate::component::Component;
use crate::ir::{Expr, RuntimeClass, Stmt};

/// Emits the code that polls and records a mouse during a routine.
#[derive(Debug, Clone)]
pub struct MouseComponent {
    params: MouseParams,
}

impl MouseComponent {
    pub fn new(params: MouseParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &MouseParams {
        &self.params
    }

    fn mouse(&self) -> Expr {
        Expr::Name(self.params.ident())
    }

    fn status(&self) -> Expr {
        self.mouse().field("status")
    }

    fn record_key(&self, channel: &str) -> String {
        format!("{}.{}", self.params.name, channel)
    }

    /// Mouse object and the `x, y` placeholders.
    pub fn declare(&self) -> Vec<Stmt> {
        vec![
            Stmt::assign(self.mouse(), Expr::Construct(RuntimeClass::Mouse)),
            Stmt::DeclareLocals(vec![intern_ident("x"), intern_ident("y")]),
        ]
    }

    /// Fresh sample lists and the valid-click flag for one routine repetition.
    pub fn routine_start(&self) -> Vec<Stmt> {
        let p = &self.params;
        let mut code = vec![Stmt::comment(format!(
            "setup some lists for storing info about the {}",
            p.name
        ))];

        if p.records_samples() {
            for channel in STANDARD_CHANNELS.iter() {
                code.push(Stmt::assign(self.mouse().attr(channel), Expr::List(vec![])));
            }
        }
        if !p.clickable_targets().is_empty() {
            for attribute in p.clicked_attributes() {
                code.push(Stmt::assign(
                    self.mouse().attr(&clicked_channel(&attribute)),
                    Expr::List(vec![]),
                ));
            }
        }

        code.push(Stmt::comment("until a click is received"));
        code.push(Stmt::assign(Expr::state("gotValidClick"), Expr::Bool(false)));
        code
    }

    /// Start/stop window tests and the sampling done while the mouse is active.
    pub fn each_frame(&self, ctx: &RoutineContext) -> Vec<Stmt> {
        let p = &self.params;
        if !p.has_frame_behaviour() {
            return Vec::new();
        }

        let mut code = vec![
            Stmt::comment(format!("*{}* updates", p.name)),
            self.start_test(),
        ];
        code.extend(self.stop_test());

        let mut active = Vec::new();
        if p.records_samples() {
            active.extend(self.sample(ctx));
        }
        let targets = p.clickable_targets();
        if !targets.is_empty() {
            active.extend(self.hit_test(&targets));
        }
        active.extend(self.termination());

        let buttons = Expr::state("buttons");
        let pressed = Stmt::assign(buttons.clone(), self.mouse().call("getPressed", vec![]));
        let guarded = if p.detects_clicks() {
            let mut new_click = vec![Stmt::comment("state changed to a new click")];
            new_click.extend(active);
            vec![
                pressed,
                Stmt::when(
                    Expr::Changed(
                        Box::new(buttons.clone()),
                        Box::new(Expr::state("prevButtonState")),
                    ),
                    vec![
                        Stmt::comment("button state changed"),
                        Stmt::assign(Expr::state("prevButtonState"), buttons.clone()),
                        Stmt::when(Expr::AnyPressed(Box::new(buttons)), new_click),
                    ],
                ),
            ]
        } else {
            // every frame, no change detection
            let mut every = vec![pressed];
            every.extend(active);
            every
        };

        let mut started = vec![Stmt::comment("only update if started and not stopped!")];
        started.extend(guarded);
        code.push(Stmt::when(
            self.status().eq(Expr::Status(ComponentStatus::Started)),
            started,
        ));
        code
    }

    /// Final sample (for `final`) and the data records for this repetition.
    pub fn routine_end(&self, ctx: &RoutineContext) -> Vec<Stmt> {
        let p = &self.params;
        if p.save_mouse_state == SaveMouseState::Never {
            return Vec::new();
        }

        let handler = ctx.data_handler();
        let staircase = handler.kind.is_staircase();
        let handler_name = intern_ident(&handler.name);
        let targets = p.clickable_targets();
        let attributes = p.clicked_attributes();

        let mut code = Vec::new();
        if staircase {
            warn!(
                component = %p.name,
                staircase = %handler.name,
                "mouse data is not recorded inside a staircase"
            );
            code.push(Stmt::comment(
                "NB mouse responses have no 'correct answer' so a StairHandler cannot use them",
            ));
        } else {
            code.push(Stmt::comment(format!(
                "store data for {} ({})",
                handler.name, handler.kind
            )));
        }

        let record = |channel: &str, value: Expr| Stmt::AddData {
            handler: handler_name.clone(),
            key: self.record_key(channel),
            value,
        };

        if p.save_mouse_state == SaveMouseState::Final {
            let buttons = Expr::state("buttons");
            let mut last = vec![Stmt::Unpack {
                names: vec![intern_ident("x"), intern_ident("y")],
                value: self.mouse().call("getPos", vec![]),
            }];
            last.push(Stmt::assign(
                buttons.clone(),
                self.mouse().call("getPressed", vec![]),
            ));
            last.push(Stmt::assign(self.mouse().field("time"), self.clock_time(ctx)));
            if !targets.is_empty() {
                last.push(Stmt::when(
                    Expr::AnyPressed(Box::new(buttons.clone())),
                    self.hit_test(&targets),
                ));
            }
            if !staircase {
                last.push(record("x", Expr::name("x")));
                last.push(record("y", Expr::name("y")));
                for (i, channel) in BUTTON_CHANNELS.iter().enumerate() {
                    last.push(record(channel, buttons.clone().index(i)));
                }
                if !targets.is_empty() {
                    for attribute in &attributes {
                        let channel = clicked_channel(attribute);
                        last.push(self.first_value(&channel, &record));
                    }
                }
            }
            // every component writes into one routine-end block, so the sample gets its own scope
            code.push(Stmt::Scope(last));
        } else if !staircase {
            let mut channels: Vec<Atom> = STANDARD_CHANNELS.to_vec();
            if !targets.is_empty() {
                channels.extend(attributes.iter().map(|a| clicked_channel(a)));
            }
            let keep_all = p.save_mouse_state == SaveMouseState::EveryFrame
                || p.force_end_routine_on_press == ForceEndRoutine::Never;
            for channel in &channels {
                if keep_all {
                    code.push(record(channel, self.mouse().attr(channel)));
                } else {
                    // ending on a click leaves at most one sample worth keeping
                    code.push(self.first_value(channel, &record));
                }
            }
        }

        if !staircase && ctx.is_experiment_level(&handler) {
            code.push(Stmt::NextEntry {
                handler: handler_name.clone(),
            });
        }
        code
    }

    fn first_value(&self, channel: &Atom, record: &impl Fn(&str, Expr) -> Stmt) -> Stmt {
        let list = self.mouse().attr(channel);
        Stmt::when(
            Expr::NonEmpty(Box::new(list.clone())),
            vec![record(channel, list.index(0))],
        )
    }

    fn clock_time(&self, ctx: &RoutineContext) -> Expr {
        Expr::name(&ctx.clock(self.params.time_relative_to)).call("getTime", vec![])
    }

    fn start_test(&self) -> Stmt {
        let p = &self.params;
        let not_started = self.status().eq(Expr::Status(ComponentStatus::NotStarted));
        let cond = match p.start_value() {
            None => not_started,
            Some(val) => {
                let window = match p.start_type {
                    StartType::Time => Expr::name("t").ge(Expr::code(val)),
                    StartType::Frame => Expr::name("frameN").ge(Expr::code(val)),
                    StartType::Condition => Expr::code(val),
                };
                window.and(not_started)
            }
        };

        let mut body = vec![
            Stmt::comment("keep track of start time/frame for later"),
            Stmt::assign(self.mouse().field("tStart"), Expr::name("t")),
            Stmt::assign(self.mouse().field("frameNStart"), Expr::name("frameN")),
            Stmt::assign(self.status(), Expr::Status(ComponentStatus::Started)),
        ];
        if p.new_clicks_only {
            body.push(Stmt::comment("if button is down already this ISN'T a new click"));
            body.push(Stmt::assign(
                Expr::state("prevButtonState"),
                self.mouse().call("getPressed", vec![]),
            ));
        } else {
            body.push(Stmt::comment("if now button is down we will treat as 'new' click"));
            body.push(Stmt::assign(
                Expr::state("prevButtonState"),
                Expr::List(vec![Expr::Int(0), Expr::Int(0), Expr::Int(0)]),
            ));
        }
        Stmt::when(cond, body)
    }

    fn stop_test(&self) -> Option<Stmt> {
        let p = &self.params;
        let val = Expr::code(p.stop_value()?);
        let window = match p.stop_type {
            StopType::Time => Expr::name("t").ge(val),
            StopType::Duration => Expr::name("t").ge(self.mouse().field("tStart").add(val)),
            StopType::Frame => Expr::name("frameN").ge(val),
            StopType::DurationFrames => {
                Expr::name("frameN").ge(self.mouse().field("frameNStart").add(val))
            }
            StopType::Condition => val,
        };
        Some(Stmt::when(
            self.status()
                .eq(Expr::Status(ComponentStatus::Started))
                .and(window),
            vec![Stmt::assign(
                self.status(),
                Expr::Status(ComponentStatus::Stopped),
            )],
        ))
    }

    fn sample(&self, ctx: &RoutineContext) -> Vec<Stmt> {
        let buttons = Expr::state("buttons");
        let mut code = vec![Stmt::Unpack {
            names: vec![intern_ident("x"), intern_ident("y")],
            value: self.mouse().call("getPos", vec![]),
        }];
        code.push(Stmt::append(self.mouse().field("x"), Expr::name("x")));
        code.push(Stmt::append(self.mouse().field("y"), Expr::name("y")));
        for (i, channel) in BUTTON_CHANNELS.iter().enumerate() {
            code.push(Stmt::append(
                self.mouse().attr(channel),
                buttons.clone().index(i),
            ));
        }
        code.push(Stmt::append(self.mouse().field("time"), self.clock_time(ctx)));
        code
    }

    /// Records every configured target under the pointer, not just the first.
    fn hit_test(&self, targets: &[Atom]) -> Vec<Stmt> {
        let obj = intern_ident("obj");
        let mut hit = vec![Stmt::assign(Expr::state("gotValidClick"), Expr::Bool(true))];
        for attribute in self.params.clicked_attributes() {
            hit.push(Stmt::append(
                self.mouse().attr(&clicked_channel(&attribute)),
                Expr::Name(obj.clone()).attr(&attribute),
            ));
        }
        vec![
            Stmt::comment("check if the mouse was inside our 'clickable' objects"),
            Stmt::ForEach {
                var: obj.clone(),
                items: targets.iter().cloned().map(Expr::Name).collect(),
                body: vec![Stmt::when(
                    Expr::Name(obj).call("contains", vec![self.mouse()]),
                    hit,
                )],
            },
        ]
    }

    /// Emitted inside the new-click branch on purpose, not on every STARTED frame.
    fn termination(&self) -> Vec<Stmt> {
        match self.params.force_end_routine_on_press {
            ForceEndRoutine::Never => Vec::new(),
            ForceEndRoutine::AnyClick => vec![
                Stmt::comment("abort routine on response"),
                Stmt::EndRoutine,
            ],
            ForceEndRoutine::ValidClick => vec![
                Stmt::comment("abort routine on response"),
                Stmt::when(Expr::state("gotValidClick"), vec![Stmt::EndRoutine]),
            ],
        }
    }
}

impl Component for MouseComponent {
    fn name(&self) -> &str {
        &self.params.name
    }

    fn kind(&self) -> &'static str {
        "Mouse"
    }

    fn emit(&self, phase: EmitPhase, ctx: &RoutineContext) -> Vec<Stmt> {
        match phase {
            EmitPhase::Declare => self.declare(),
            EmitPhase::RoutineStart => self.routine_start(),
            EmitPhase::EachFrame => self.each_frame(ctx),
            EmitPhase::RoutineEnd => self.routine_end(ctx),
        }
    }

    fn required_imports(&self, runtime: TargetRuntime) -> &'static [&'static str] {
        match runtime {
            TargetRuntime::Desktop => &["event"],
            TargetRuntime::Browser => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{max_depth, recorded_keys};
    use cogex_experiment::{LoopKind, TimeRelativeTo};

    fn mouse(save: SaveMouseState, force_end: ForceEndRoutine, clickable: &str) -> MouseComponent {
        MouseComponent::new(MouseParams {
            save_mouse_state: save,
            force_end_routine_on_press: force_end,
            clickable: clickable.to_string(),
            ..MouseParams::default()
        })
    }

    fn trials() -> RoutineContext {
        RoutineContext::new("trial").with_loop("trials", LoopKind::TrialHandler)
    }

    #[test]
    fn routine_start_lists_follow_save_mode() {
        let code = mouse(SaveMouseState::OnClick, ForceEndRoutine::Never, "a, b").routine_start();
        let lists = code
            .iter()
            .filter(|s| matches!(s, Stmt::Assign { value: Expr::List(v), .. } if v.is_empty()))
            .count();
        assert_eq!(lists, 6 + 1);

        let code = mouse(SaveMouseState::Final, ForceEndRoutine::Never, "").routine_start();
        assert_eq!(
            code.last(),
            Some(&Stmt::assign(Expr::state("gotValidClick"), Expr::Bool(false)))
        );
        assert!(!code.iter().any(|s| matches!(s, Stmt::Assign { value: Expr::List(_), .. })));
    }

    #[test]
    fn click_detection_nests_three_deep() {
        let code = mouse(SaveMouseState::OnClick, ForceEndRoutine::AnyClick, "")
            .each_frame(&trials());
        // started guard > changed > new click
        assert_eq!(max_depth(&code), 3);

        let code = mouse(SaveMouseState::EveryFrame, ForceEndRoutine::Never, "")
            .each_frame(&trials());
        assert_eq!(max_depth(&code), 1);
    }

    #[test]
    fn termination_sits_in_new_click_branch() {
        let code = mouse(SaveMouseState::Final, ForceEndRoutine::AnyClick, "")
            .each_frame(&trials());
        let Some(Stmt::If { body: started, .. }) = code.last() else {
            panic!("missing started guard");
        };
        let Some(Stmt::If { body: changed, .. }) = started.last() else {
            panic!("missing change test");
        };
        let Some(Stmt::If { body: new_click, .. }) = changed.last() else {
            panic!("missing new click test");
        };
        assert_eq!(new_click.last(), Some(&Stmt::EndRoutine));
    }

    #[test]
    fn experiment_clock_when_relative_to_experiment() {
        let mut m = mouse(SaveMouseState::EveryFrame, ForceEndRoutine::Never, "");
        m.params.time_relative_to = TimeRelativeTo::Experiment;
        let code = m.each_frame(&trials());
        let mut clocks = Vec::new();
        crate::ir::walk(&code, &mut |s| {
            if let Stmt::Append { value: Expr::Call { recv, .. }, .. } = s {
                clocks.push((**recv).clone());
            }
        });
        assert_eq!(clocks, vec![Expr::name("globalClock")]);
    }

    #[test]
    fn final_records_first_click_attributes() {
        let code = mouse(SaveMouseState::Final, ForceEndRoutine::ValidClick, "target")
            .routine_end(&trials());
        assert_eq!(
            recorded_keys(&code),
            [
                "mouse.x",
                "mouse.y",
                "mouse.leftButton",
                "mouse.midButton",
                "mouse.rightButton",
                "mouse.clicked_name"
            ]
        );
    }

    #[test]
    fn staircase_skips_records() {
        let ctx = RoutineContext::new("trial").with_loop("stairs", LoopKind::StairHandler);
        for save in [SaveMouseState::Final, SaveMouseState::OnClick, SaveMouseState::EveryFrame] {
            let code = mouse(save, ForceEndRoutine::AnyClick, "target").routine_end(&ctx);
            assert!(recorded_keys(&code).is_empty(), "{save}");
            assert!(matches!(code.first(), Some(Stmt::Comment(c)) if c.contains("StairHandler")));
            assert!(!code.iter().any(|s| matches!(s, Stmt::NextEntry { .. })));
        }
    }

    #[test]
    fn next_entry_only_outside_loops() {
        let m = mouse(SaveMouseState::EveryFrame, ForceEndRoutine::Never, "");
        let inside = m.routine_end(&trials());
        assert!(!inside.iter().any(|s| matches!(s, Stmt::NextEntry { .. })));

        let outside = m.routine_end(&RoutineContext::new("trial"));
        assert_eq!(
            outside.last(),
            Some(&Stmt::NextEntry {
                handler: intern_ident("thisExp")
            })
        );
    }

    #[test]
    fn desktop_needs_event_module() {
        let m = mouse(SaveMouseState::Final, ForceEndRoutine::Never, "");
        assert_eq!(m.required_imports(TargetRuntime::Desktop), &["event"]);
        assert!(m.required_imports(TargetRuntime::Browser).is_empty());
    }
}
