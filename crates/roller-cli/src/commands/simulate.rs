use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use roller_core::{
    AppConfig, EventKind, GoOptions, ManualScheduler, Roller, RollerConfig, RollerEvent,
};

use crate::script::{Script, Step};

/// Frame cap for `settle` steps that don't set their own
pub const DEFAULT_SETTLE_FRAMES: usize = 600;

#[derive(Debug, Clone)]
pub struct SimulateOptions {
    pub script: PathBuf,
    pub max_settle: usize,
    pub realtime: bool,
    pub frame_ms: Option<u64>,
    pub events: Vec<EventKind>,
    pub json: bool,
}

pub async fn run(config: &AppConfig, options: SimulateOptions) -> Result<()> {
    let script = Script::load(&options.script)?;
    let roller_config = script.roller.clone().unwrap_or_else(|| config.roller.clone());

    let frame_ms = options.frame_ms.unwrap_or(config.general.frame_ms);
    let pacing = options.realtime.then(|| {
        let mut interval = tokio::time::interval(Duration::from_millis(frame_ms.max(1)));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    info!(
        steps = script.steps.len(),
        paged = roller_config.pages.is_some(),
        realtime = options.realtime,
        "Replaying {}",
        options.script.display()
    );

    let mut sim = Simulation::new(roller_config, pacing, &options)?;
    for (index, step) in script.steps.iter().enumerate() {
        debug!(index, ?step, "Applying step");
        sim.apply(step).await?;
    }

    let roller = &sim.roller;
    match roller.current_page() {
        Some(page) => println!(
            "\nDone after {} frames: position {:.3}, page {}",
            sim.frame, roller.position(), page
        ),
        None => println!(
            "\nDone after {} frames: position {:.3}",
            sim.frame,
            roller.position()
        ),
    }

    Ok(())
}

/// Engine plus the host-side frame loop and event sink
struct Simulation {
    roller: Roller,
    frames: ManualScheduler,
    events_rx: mpsc::UnboundedReceiver<RollerEvent>,
    pacing: Option<Interval>,
    filter: Vec<EventKind>,
    json: bool,
    max_settle: usize,
    frame: u64,
}

impl Simulation {
    fn new(
        config: RollerConfig,
        pacing: Option<Interval>,
        options: &SimulateOptions,
    ) -> Result<Self> {
        let frames = ManualScheduler::new();
        let mut roller = Roller::new(config, frames.clone())?;

        let (tx, events_rx) = mpsc::unbounded_channel();
        roller.on_any(move |event| {
            if tx.send(*event).is_err() {
                warn!("Failed to forward roller event: receiver dropped");
            }
        });

        Ok(Self {
            roller,
            frames,
            events_rx,
            pacing,
            filter: options.events.clone(),
            json: options.json,
            max_settle: options.max_settle,
            frame: 0,
        })
    }

    async fn apply(&mut self, step: &Step) -> Result<()> {
        if let Some(gesture) = step.gesture() {
            self.roller.handle(gesture);
            return self.drain();
        }

        match *step {
            Step::Frames { count } => self.run_frames(count).await?,
            Step::Settle { max_frames } => self.settle(max_frames.unwrap_or(self.max_settle)).await?,
            Step::Go { page, emit } => {
                if let Err(e) = self.roller.go_with(page, GoOptions::new().with_emit(emit)) {
                    warn!(page, error = %e, "Navigation rejected");
                }
            }
            Step::Bounds { upper, lower } => self.roller.set_bounds(upper, lower),
            Step::Reset => self.roller.reset(),
            Step::Enable => self.roller.enable(),
            Step::Disable => self.roller.disable(),
            Step::Touch | Step::DragStart | Step::DragMove { .. } | Step::DragEnd => {}
        }

        self.drain()
    }

    /// Run one scheduled frame. Returns false when nothing was scheduled.
    async fn step_frame(&mut self) -> Result<bool> {
        if !self.frames.take_request() {
            return Ok(false);
        }
        if let Some(interval) = self.pacing.as_mut() {
            interval.tick().await;
        }
        self.frame += 1;
        self.roller.frame();
        self.drain()?;
        Ok(true)
    }

    async fn run_frames(&mut self, count: usize) -> Result<()> {
        for _ in 0..count {
            if !self.step_frame().await? {
                debug!("Roller disabled, no frame scheduled");
                break;
            }
        }
        Ok(())
    }

    async fn settle(&mut self, max_frames: usize) -> Result<()> {
        for _ in 0..max_frames {
            if self.roller.is_settled() && !self.roller.has_pending_callback() {
                return Ok(());
            }
            if !self.step_frame().await? {
                return Ok(());
            }
        }
        warn!(max_frames, position = self.roller.position(), "Roller did not settle");
        Ok(())
    }

    fn drain(&mut self) -> Result<()> {
        while let Ok(event) = self.events_rx.try_recv() {
            if !self.filter.is_empty() && !self.filter.contains(&event.kind()) {
                continue;
            }
            if self.json {
                let mut value = serde_json::to_value(event)?;
                if let Some(map) = value.as_object_mut() {
                    map.insert("frame".to_string(), self.frame.into());
                }
                println!("{value}");
            } else {
                println!("[frame {:>5}] {}", self.frame, event);
            }
        }
        Ok(())
    }
}
