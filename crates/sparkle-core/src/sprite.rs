#![forbid(unsafe_code)]

//! Sprite atlas metadata and load state.
//!
//! The atlas is a single strip holding four 7x7 frames at fixed x-offsets.
//! Loading is host-driven and may complete after the first ticks; until the
//! sheet is [`LoadStatus::Ready`] the draw pass skips sprite compositing and
//! applies only the color tint.

use rand::Rng;

use crate::error::ResourceError;

/// Edge length of one frame in pixels.
pub const FRAME_SIZE: u32 = 7;

/// X-offsets of the frames within the atlas strip.
pub const FRAME_OFFSETS: [u32; 4] = [0, 6, 13, 20];

/// Minimum atlas width able to hold the last frame.
pub const MIN_ATLAS_WIDTH: u32 = FRAME_OFFSETS[FRAME_OFFSETS.len() - 1] + FRAME_SIZE;

/// Default atlas location on the stock site.
pub const DEFAULT_SPRITE_URL: &str = "/assets/images/sparkle.png";

/// Index of one frame in [`FRAME_OFFSETS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SpriteFrame(u8);

impl SpriteFrame {
    /// Returns `None` for indices outside the atlas.
    #[must_use]
    pub fn new(index: u8) -> Option<Self> {
        (usize::from(index) < FRAME_OFFSETS.len()).then_some(Self(index))
    }

    /// Uniform pick among the four frames.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self(rng.random_range(0..FRAME_OFFSETS.len() as u8))
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Source x-offset of this frame within the atlas.
    #[must_use]
    pub const fn offset(self) -> u32 {
        FRAME_OFFSETS[self.0 as usize]
    }
}

/// Where the host should fetch the atlas from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteSource {
    /// File path or URL, resolved by the host.
    Url(String),
    /// Encoded image bytes (PNG, GIF, ...), with their MIME type.
    Embedded { bytes: Vec<u8>, mime: String },
}

impl Default for SpriteSource {
    fn default() -> Self {
        Self::Url(DEFAULT_SPRITE_URL.to_owned())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Pending,
    Ready,
    Failed(ResourceError),
}

/// The atlas image plus its load state. `I` is the host's drawable handle.
#[derive(Debug, Clone)]
pub struct SpriteSheet<I> {
    status: LoadStatus,
    image: Option<I>,
}

impl<I> Default for SpriteSheet<I> {
    fn default() -> Self {
        Self::pending()
    }
}

impl<I> SpriteSheet<I> {
    /// A sheet whose image has not arrived yet.
    #[must_use]
    pub const fn pending() -> Self {
        Self {
            status: LoadStatus::Pending,
            image: None,
        }
    }

    /// A sheet that is immediately usable.
    pub fn ready(image: I, width: u32, height: u32) -> Result<Self, ResourceError> {
        let mut sheet = Self::pending();
        sheet.mark_ready(image, width, height)?;
        Ok(sheet)
    }

    #[must_use]
    pub const fn frame_offsets(&self) -> &'static [u32; 4] {
        &FRAME_OFFSETS
    }

    #[must_use]
    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// The drawable image, only while the sheet is ready.
    #[must_use]
    pub fn image(&self) -> Option<&I> {
        match self.status {
            LoadStatus::Ready => self.image.as_ref(),
            _ => None,
        }
    }

    /// Record a completed load. Atlases too small for every frame are
    /// rejected and leave the sheet failed.
    pub fn mark_ready(&mut self, image: I, width: u32, height: u32) -> Result<(), ResourceError> {
        if width < MIN_ATLAS_WIDTH || height < FRAME_SIZE {
            let err = ResourceError::AtlasTooSmall { width, height };
            self.mark_failed(err.clone());
            return Err(err);
        }
        self.image = Some(image);
        self.status = LoadStatus::Ready;
        crate::debug!(width, height, "sprite atlas ready");
        Ok(())
    }

    /// Record a failed load. There is no automatic retry.
    pub fn mark_failed(&mut self, err: ResourceError) {
        crate::warn!(error = %err, "sprite atlas unavailable; drawing tint only");
        self.image = None;
        self.status = LoadStatus::Failed(err);
    }
}
