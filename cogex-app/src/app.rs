use anyhow::{Context, Result, anyhow, bail};
use cogex_codegen::{Component, MouseComponent, RoutineScript, compile_routine, printer_for};
use cogex_core::{EmitPhase, TargetRuntime};
use cogex_experiment::{MouseParams, RoutineContext};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const USAGE: &str = "\
usage: cogex <design.json> [--target desktop|browser|both] [--out DIR] [--json]

Compiles every routine in the design file. Without --out the scripts are
printed to stdout. --json emits the compiled sections of every routine as
one JSON document (scripts.json under --out) instead of assembled scripts.
Set COGEX_LOG (e.g. COGEX_LOG=debug) for emission logs.";

/// Experiment design as saved by the authoring tool.
#[derive(Debug, Clone, Deserialize)]
pub struct Design {
    pub routines: Vec<RoutineDesign>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoutineDesign {
    #[serde(flatten)]
    pub context: RoutineContext,
    #[serde(default)]
    pub components: Vec<MouseParams>,
}

impl Design {
    pub fn from_json(json: &str) -> Result<Self> {
        let design: Design = serde_json::from_str(json).context("invalid design file")?;
        for routine in &design.routines {
            for params in &routine.components {
                params
                    .validate()
                    .with_context(|| format!("in routine '{}'", routine.context.name))?;
            }
        }
        Ok(design)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&json)
    }
}

/// One routine compiled for one runtime, as written by `--json`.
#[derive(Debug, Serialize)]
pub struct CompiledRoutine<'a> {
    pub routine: &'a str,
    pub runtime: TargetRuntime,
    #[serde(flatten)]
    pub script: RoutineScript,
}

pub enum Invocation {
    Help,
    Compile(App),
}

pub struct App {
    design: Design,
    targets: Vec<TargetRuntime>,
    out_dir: Option<PathBuf>,
    json: bool,
}

impl App {
    pub fn new(design: Design, targets: Vec<TargetRuntime>, out_dir: Option<PathBuf>) -> Self {
        Self {
            design,
            targets,
            out_dir,
            json: false,
        }
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn from_args(args: &[String]) -> Result<Invocation> {
        let mut design_path = None;
        let mut targets = TargetRuntime::ALL.to_vec();
        let mut out_dir = None;
        let mut json = false;

        let mut args = args.iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Invocation::Help),
                "-t" | "--target" => {
                    let value = args.next().ok_or_else(|| anyhow!("--target needs a value"))?;
                    targets = match value.as_str() {
                        "both" => TargetRuntime::ALL.to_vec(),
                        one => vec![one.parse().map_err(|e: String| anyhow!(e))?],
                    };
                }
                "-o" | "--out" => {
                    let value = args.next().ok_or_else(|| anyhow!("--out needs a directory"))?;
                    out_dir = Some(PathBuf::from(value));
                }
                "--json" => json = true,
                flag if flag.starts_with('-') => bail!("unknown option '{flag}'\n\n{USAGE}"),
                path => {
                    if design_path.replace(PathBuf::from(path)).is_some() {
                        bail!("only one design file may be given");
                    }
                }
            }
        }

        let Some(design_path) = design_path else {
            return Ok(Invocation::Help);
        };
        let design = Design::load(&design_path)?;
        Ok(Invocation::Compile(
            App::new(design, targets, out_dir).with_json(json),
        ))
    }

    pub fn run(&self) -> Result<()> {
        if let Some(dir) = &self.out_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let mut compiled = Vec::new();
        for routine in &self.design.routines {
            let components: Vec<MouseComponent> = routine
                .components
                .iter()
                .cloned()
                .map(MouseComponent::new)
                .collect();
            let refs: Vec<&dyn Component> =
                components.iter().map(|c| c as &dyn Component).collect();

            for &runtime in &self.targets {
                let script = compile_routine(&refs, &routine.context, printer_for(runtime));
                if self.json {
                    compiled.push(CompiledRoutine {
                        routine: &routine.context.name,
                        runtime,
                        script,
                    });
                    continue;
                }
                let text = assemble(&routine.context.name, runtime, &script);
                let file = format!("{}.{}", routine.context.name, runtime.file_extension());
                self.emit(&file, &text)?;
            }
        }

        if self.json {
            let text = serde_json::to_string_pretty(&compiled)
                .context("failed to serialize compiled routines")?;
            self.emit("scripts.json", &(text + "\n"))?;
        }
        Ok(())
    }

    /// Writes `text` to `file` under the output directory, or prints it.
    fn emit(&self, file: &str, text: &str) -> Result<()> {
        match &self.out_dir {
            Some(dir) => {
                let path = dir.join(file);
                fs::write(&path, text)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "wrote script");
            }
            None => print!("{text}"),
        }
        Ok(())
    }
}

/// Lays the compiled sections out one after another under banner comments.
pub fn assemble(routine: &str, runtime: TargetRuntime, script: &RoutineScript) -> String {
    let comment = match runtime {
        TargetRuntime::Desktop => "#",
        TargetRuntime::Browser => "//",
    };
    let mut text = String::new();
    for module in &script.imports {
        text.push_str(&format!("from psychopy import {module}\n"));
    }
    for phase in EmitPhase::ALL {
        let section = script.section(phase);
        if section.is_empty() {
            continue;
        }
        text.push_str(&format!("{comment} --- {routine}: {} ---\n", phase.label()));
        text.push_str(section);
        text.push('\n');
    }
    text
}
