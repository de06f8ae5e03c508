#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Station Defender adapters.
//!
//! Nothing here reaches into process-wide state: adapters hand a
//! [`RenderContext`] and an [`AudioSink`] to the functions that need them.

use anyhow::Result as AnyResult;
use glam::Vec2;
use station_defender_core::{
    AlienKind, Bounds, DestructionCause, Event, Outcome, Point, UnitKind, WeaponKind,
};
use station_defender_world::{query, World};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used to tint sprites.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Untinted sprite color.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: self.red + (1.0 - self.red) * amount,
            green: self.green + (1.0 - self.green) * amount,
            blue: self.blue + (1.0 - self.blue) * amount,
            alpha: self.alpha,
        }
    }

    /// Returns a new color with every color channel scaled by `factor`.
    #[must_use]
    pub fn dim(self, factor: f32) -> Self {
        let factor = factor.clamp(0.0, 1.0);

        Self {
            red: self.red * factor,
            green: self.green * factor,
            blue: self.blue * factor,
            alpha: self.alpha,
        }
    }
}

/// Brightness applied to units locked in combat.
pub const ENGAGED_DIM: f32 = 0.5;

const TILE_BLOCKED: Color = Color::from_rgb_u8(170, 60, 60);
const TILE_HOVER_LIGHTEN: f32 = 0.3;
const TILE_HOVER_OCCUPIED_DIM: f32 = 0.6;

/// Artwork a sprite is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKey {
    /// The defended tower.
    Tower,
    /// Empty placement tile.
    Tile,
    /// Tile carrying a pickup.
    TileItem,
    /// Alien-family unit.
    Alien(AlienKind),
    /// Built weapon.
    Weapon(WeaponKind),
    /// Weapon still under construction.
    Construction,
    /// Projectile in flight.
    Projectile,
    /// Explosion shown where a unit was destroyed.
    Explosion,
}

/// Single textured rectangle of a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sprite {
    /// Artwork to draw.
    pub key: SpriteKey,
    /// World-space rectangle covered by the sprite.
    pub bounds: Bounds,
    /// Tint multiplied into the artwork.
    pub tint: Color,
}

/// Drawing surface supplied by a rendering backend.
pub trait RenderContext {
    /// Draws a single sprite.
    fn draw(&mut self, sprite: &Sprite);
}

/// Sound effects the simulation asks adapters to play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// A unit was destroyed in combat.
    Destruction,
    /// An enemy reached the tower.
    Overrun,
    /// The match was won.
    Victory,
    /// The match was lost.
    Defeat,
}

/// Audio output supplied by an adapter.
pub trait AudioSink {
    /// Plays `effect` once without looping.
    fn play_once(&mut self, effect: SoundEffect);
}

/// Pointer state captured by an adapter for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    /// Pointer position in world units.
    pub position: Vec2,
    /// Whether the primary button went down on this frame.
    pub pressed: bool,
}

impl PointerInput {
    /// Pointer position as a world-space point.
    #[must_use]
    pub fn world_point(&self) -> Point {
        Point::new(self.position.x, self.position.y)
    }

    /// Reports whether a single-pixel probe at the pointer overlaps `bounds`.
    #[must_use]
    pub fn is_colliding(&self, bounds: Bounds) -> bool {
        bounds.contains(self.world_point())
    }
}

/// Mapping between window pixels, origin top-left, and world units, origin bottom-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    screen: Vec2,
    world: Vec2,
}

impl Viewport {
    /// Creates a viewport stretching `world` units over `screen` pixels.
    pub fn new(screen: Vec2, world: Vec2) -> Result<Self, RenderingError> {
        for (name, size) in [("screen", screen), ("world", world)] {
            if !(size.x > 0.0 && size.y > 0.0) {
                return Err(RenderingError::InvalidViewport {
                    name,
                    width: size.x,
                    height: size.y,
                });
            }
        }
        Ok(Self { screen, world })
    }

    /// Converts a window position into world units.
    #[must_use]
    pub fn to_world(&self, screen_position: Vec2) -> Vec2 {
        let scale = self.world / self.screen;
        Vec2::new(
            screen_position.x * scale.x,
            (self.screen.y - screen_position.y) * scale.y,
        )
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Pointer state, if the pointer is over the window.
    pub pointer: Option<PointerInput>,
    /// Whether the player asked to upgrade the hovered weapon.
    pub upgrade_action: bool,
    /// Quick slot chosen on this frame, counted from zero.
    pub select_slot: Option<usize>,
}

/// Heads-up display values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hud {
    /// Money available for upgrades.
    pub money: u32,
    /// Score accumulated from kills.
    pub score: u32,
    /// Result of the match once decided.
    pub outcome: Option<Outcome>,
}

/// Everything drawn in one frame, back to front.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Sprites in draw order.
    pub sprites: Vec<Sprite>,
    /// Heads-up display values.
    pub hud: Hud,
}

impl Scene {
    /// Captures the world, highlighting the tile under `cursor` for placement feedback.
    #[must_use]
    pub fn capture(world: &World, cursor: Option<Point>) -> Self {
        let mut sprites = vec![Sprite {
            key: SpriteKey::Tower,
            bounds: query::tower(world),
            tint: Color::WHITE,
        }];

        for tile in query::tiles(world) {
            let hovered = cursor.map_or(false, |point| tile.bounds.contains(point));
            let tint = if tile.invalid {
                TILE_BLOCKED
            } else if hovered && tile.occupied {
                Color::WHITE.dim(TILE_HOVER_OCCUPIED_DIM)
            } else if hovered {
                Color::WHITE.lighten(TILE_HOVER_LIGHTEN)
            } else {
                Color::WHITE
            };
            let key = if tile.has_item {
                SpriteKey::TileItem
            } else {
                SpriteKey::Tile
            };
            sprites.push(Sprite {
                key,
                bounds: tile.bounds,
                tint,
            });
        }

        for unit in query::unit_view(world).iter() {
            let key = match unit.kind {
                UnitKind::Alien(kind) => SpriteKey::Alien(kind),
                UnitKind::Weapon(_) if !unit.built => SpriteKey::Construction,
                UnitKind::Weapon(kind) => SpriteKey::Weapon(kind),
            };
            let tint = if unit.is_engaged() {
                Color::WHITE.dim(ENGAGED_DIM)
            } else {
                Color::WHITE
            };
            sprites.push(Sprite {
                key,
                bounds: unit.bounds,
                tint,
            });
        }

        sprites.extend(query::projectiles(world).into_iter().map(|bounds| Sprite {
            key: SpriteKey::Projectile,
            bounds,
            tint: Color::WHITE,
        }));

        let player = query::player(world);
        Self {
            sprites,
            hud: Hud {
                money: player.money(),
                score: player.score(),
                outcome: query::outcome(world),
            },
        }
    }

    /// Draws every sprite in order.
    pub fn render<C>(&self, ctx: &mut C)
    where
        C: RenderContext + ?Sized,
    {
        for sprite in &self.sprites {
            ctx.draw(sprite);
        }
    }
}

/// Plays the sounds for a batch of world events and returns explosion sprites to overlay.
pub fn play_effects<A>(events: &[Event], audio: &mut A) -> Vec<Sprite>
where
    A: AudioSink + ?Sized,
{
    let mut explosions = Vec::new();
    for event in events {
        match event {
            Event::UnitDestroyed { cause, bounds, .. } => {
                if *cause != DestructionCause::ReachedTower {
                    audio.play_once(SoundEffect::Destruction);
                }
                explosions.push(Sprite {
                    key: SpriteKey::Explosion,
                    bounds: *bounds,
                    tint: Color::WHITE,
                });
            }
            Event::LaneOverrun { .. } => audio.play_once(SoundEffect::Overrun),
            Event::GameOver { outcome } => audio.play_once(match outcome {
                Outcome::Won => SoundEffect::Victory,
                Outcome::Lost => SoundEffect::Defeat,
            }),
            _ => {}
        }
    }
    explosions
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Station Defender scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta and per-frame
    /// input, and rebuilds the scene before it is presented. Returning `false` ends the run.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Viewport extents must be positive.
    InvalidViewport {
        /// Which extent failed validation.
        name: &'static str,
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidViewport {
                name,
                width,
                height,
            } => {
                write!(
                    f,
                    "{name} size must be positive (received {width}x{height})"
                )
            }
        }
    }
}

impl Error for RenderingError {}
