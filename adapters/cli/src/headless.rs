use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use anyhow::{bail, Result};
use station_defender_rendering::{
    AudioSink, FrameInput, Presentation, RenderContext, RenderingBackend, Scene, SoundEffect,
    Sprite, SpriteKey,
};
use tracing::{debug, info};

/// Backend that steps the scene at a fixed rate without opening a window.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frame: Duration,
    max_frames: usize,
    script: VecDeque<FrameInput>,
}

impl HeadlessBackend {
    /// Creates a backend that replays `script`, one input per frame, then idles.
    pub(crate) fn new(frame: Duration, max_frames: usize, script: VecDeque<FrameInput>) -> Self {
        Self {
            frame,
            max_frames,
            script,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool,
    {
        info!(title = %presentation.window_title, "headless presentation started");
        let mut scene = presentation.scene;

        for frame in 0..self.max_frames {
            let input = self.script.pop_front().unwrap_or_default();
            let running = update_scene(self.frame, input, &mut scene);

            let mut tally = SpriteTally::default();
            scene.render(&mut tally);
            if !running {
                debug!(frame, sprites = ?tally.0, "final frame presented");
                return Ok(());
            }
        }

        bail!("match undecided after {} frames", self.max_frames)
    }
}

/// Render context that only counts sprites per artwork.
#[derive(Debug, Default)]
struct SpriteTally(BTreeMap<String, usize>);

impl RenderContext for SpriteTally {
    fn draw(&mut self, sprite: &Sprite) {
        let label = match sprite.key {
            SpriteKey::Alien(kind) => kind.name().to_owned(),
            SpriteKey::Weapon(kind) => format!("{kind:?} weapon"),
            key => format!("{key:?}"),
        };
        *self.0.entry(label).or_default() += 1;
    }
}

/// Audio sink that writes each effect to the log.
#[derive(Debug, Default)]
pub(crate) struct LoggedAudio;

impl AudioSink for LoggedAudio {
    fn play_once(&mut self, effect: SoundEffect) {
        info!(?effect, "sound effect");
    }
}
