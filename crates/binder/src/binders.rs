//! Concrete binders
//!
//! One binder per displayable attribute. Title and subtitle reads are
//! usually fast but still routed through the background path so a slow
//! metadata store can never stall the rendering thread; artwork decoding
//! is genuinely slow and is additionally downscaled to a target dimension
//! before it is cached.

use crate::engine::{BindEngine, BindProfile, DataBinder};
use crate::pool::BinderConfig;
use crate::target::{ImageTarget, TextTarget};
use medley_cache::LibraryItemCache;
use medley_core::{
    Artwork, ArtworkSource, DisplayableDefaults, ItemId, LibraryItem, LibraryReadError,
};
use std::marker::PhantomData;
use std::sync::Arc;

/// Binds item titles to text targets.
pub struct TitleBinder<V: TextTarget> {
    engine: BindEngine<TitleProfile<V>>,
}

impl<V: TextTarget> TitleBinder<V> {
    /// Create a title binder over the shared cache and defaults.
    pub fn new(cache: Arc<dyn LibraryItemCache>, defaults: Arc<DisplayableDefaults>) -> Self {
        Self::with_config(cache, defaults, BinderConfig::default())
    }

    /// Create a title binder with a custom worker configuration.
    pub fn with_config(
        cache: Arc<dyn LibraryItemCache>,
        defaults: Arc<DisplayableDefaults>,
        config: BinderConfig,
    ) -> Self {
        Self {
            engine: BindEngine::new(
                TitleProfile {
                    cache,
                    defaults,
                    _view: PhantomData,
                },
                config,
            ),
        }
    }
}

impl<V: TextTarget> DataBinder<V> for TitleBinder<V> {
    fn bind(&self, view: &V, item: Arc<dyn LibraryItem>) {
        self.engine.bind(view, item);
    }

    fn cancel_all(&self) {
        self.engine.cancel_all();
    }

    fn poll(&self) {
        self.engine.poll();
    }

    fn has_pending_work(&self) -> bool {
        self.engine.has_pending_work()
    }
}

struct TitleProfile<V> {
    cache: Arc<dyn LibraryItemCache>,
    defaults: Arc<DisplayableDefaults>,
    _view: PhantomData<fn(&V)>,
}

impl<V: TextTarget> BindProfile for TitleProfile<V> {
    type Value = String;
    type View = V;

    fn attribute(&self) -> &'static str {
        "title"
    }

    fn cached(&self, item: ItemId) -> Option<String> {
        self.cache.title(item)
    }

    fn store(&self, item: ItemId, value: String) {
        self.cache.store_title(item, value);
    }

    fn default_value(&self) -> Option<String> {
        self.defaults.title().map(|t| t.to_string())
    }

    fn calculate(&self, item: &dyn LibraryItem) -> Result<Option<String>, LibraryReadError> {
        item.title()
    }

    fn assign(&self, view: &V, value: Option<&String>) {
        view.set_text(value.map(String::as_str));
    }
}

/// Binds item subtitles to text targets.
pub struct SubtitleBinder<V: TextTarget> {
    engine: BindEngine<SubtitleProfile<V>>,
}

impl<V: TextTarget> SubtitleBinder<V> {
    /// Create a subtitle binder over the shared cache and defaults.
    pub fn new(cache: Arc<dyn LibraryItemCache>, defaults: Arc<DisplayableDefaults>) -> Self {
        Self::with_config(cache, defaults, BinderConfig::default())
    }

    /// Create a subtitle binder with a custom worker configuration.
    pub fn with_config(
        cache: Arc<dyn LibraryItemCache>,
        defaults: Arc<DisplayableDefaults>,
        config: BinderConfig,
    ) -> Self {
        Self {
            engine: BindEngine::new(
                SubtitleProfile {
                    cache,
                    defaults,
                    _view: PhantomData,
                },
                config,
            ),
        }
    }
}

impl<V: TextTarget> DataBinder<V> for SubtitleBinder<V> {
    fn bind(&self, view: &V, item: Arc<dyn LibraryItem>) {
        self.engine.bind(view, item);
    }

    fn cancel_all(&self) {
        self.engine.cancel_all();
    }

    fn poll(&self) {
        self.engine.poll();
    }

    fn has_pending_work(&self) -> bool {
        self.engine.has_pending_work()
    }
}

struct SubtitleProfile<V> {
    cache: Arc<dyn LibraryItemCache>,
    defaults: Arc<DisplayableDefaults>,
    _view: PhantomData<fn(&V)>,
}

impl<V: TextTarget> BindProfile for SubtitleProfile<V> {
    type Value = String;
    type View = V;

    fn attribute(&self) -> &'static str {
        "subtitle"
    }

    fn cached(&self, item: ItemId) -> Option<String> {
        self.cache.subtitle(item)
    }

    fn store(&self, item: ItemId, value: String) {
        self.cache.store_subtitle(item, value);
    }

    fn default_value(&self) -> Option<String> {
        self.defaults.subtitle().map(|s| s.to_string())
    }

    fn calculate(&self, item: &dyn LibraryItem) -> Result<Option<String>, LibraryReadError> {
        item.subtitle()
    }

    fn assign(&self, view: &V, value: Option<&String>) {
        view.set_text(value.map(String::as_str));
    }
}

/// Binds item artwork to image targets.
///
/// Artwork is decoded on a background worker and downscaled to the target
/// decode dimension before caching, so scrolling a large library never
/// holds full-size bitmaps in memory. A decode failure is terminal for
/// that bind: the default artwork stays and no retry is scheduled.
pub struct ArtworkBinder<V: ImageTarget> {
    engine: BindEngine<ArtworkProfile<V>>,
}

impl<V: ImageTarget> ArtworkBinder<V> {
    /// Create an artwork binder over the shared cache and defaults.
    ///
    /// # Arguments
    ///
    /// * `cache` - the shared library item cache
    /// * `defaults` - the displayable defaults
    /// * `decode_dimension` - bitmaps larger than this on either axis are
    ///   downscaled to fit a `decode_dimension` square (aspect preserved);
    ///   0 disables downscaling
    pub fn new(
        cache: Arc<dyn LibraryItemCache>,
        defaults: Arc<DisplayableDefaults>,
        decode_dimension: u32,
    ) -> Self {
        Self::with_config(cache, defaults, decode_dimension, BinderConfig::default())
    }

    /// Create an artwork binder with a custom worker configuration.
    pub fn with_config(
        cache: Arc<dyn LibraryItemCache>,
        defaults: Arc<DisplayableDefaults>,
        decode_dimension: u32,
        config: BinderConfig,
    ) -> Self {
        Self {
            engine: BindEngine::new(
                ArtworkProfile {
                    cache,
                    defaults,
                    decode_dimension,
                    _view: PhantomData,
                },
                config,
            ),
        }
    }
}

impl<V: ImageTarget> DataBinder<V> for ArtworkBinder<V> {
    fn bind(&self, view: &V, item: Arc<dyn LibraryItem>) {
        self.engine.bind(view, item);
    }

    fn cancel_all(&self) {
        self.engine.cancel_all();
    }

    fn poll(&self) {
        self.engine.poll();
    }

    fn has_pending_work(&self) -> bool {
        self.engine.has_pending_work()
    }
}

struct ArtworkProfile<V> {
    cache: Arc<dyn LibraryItemCache>,
    defaults: Arc<DisplayableDefaults>,
    decode_dimension: u32,
    _view: PhantomData<fn(&V)>,
}

impl<V> ArtworkProfile<V> {
    fn decode(&self, source: ArtworkSource) -> Result<Arc<Artwork>, LibraryReadError> {
        let image = match source {
            ArtworkSource::Encoded(bytes) => image::load_from_memory(&bytes),
            ArtworkSource::File(path) => image::open(&path),
        }
        .map_err(decode_error)?;

        let dim = self.decode_dimension;
        let image = if dim > 0 && (image.width() > dim || image.height() > dim) {
            image.thumbnail(dim, dim)
        } else {
            image
        };

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Arc::new(Artwork::new(rgba.into_raw(), width, height)))
    }
}

impl<V: ImageTarget> BindProfile for ArtworkProfile<V> {
    type Value = Arc<Artwork>;
    type View = V;

    fn attribute(&self) -> &'static str {
        "artwork"
    }

    fn cached(&self, item: ItemId) -> Option<Arc<Artwork>> {
        self.cache.artwork(item)
    }

    fn store(&self, item: ItemId, value: Arc<Artwork>) {
        self.cache.store_artwork(item, value);
    }

    fn default_value(&self) -> Option<Arc<Artwork>> {
        self.defaults.artwork()
    }

    fn calculate(&self, item: &dyn LibraryItem) -> Result<Option<Arc<Artwork>>, LibraryReadError> {
        match item.artwork()? {
            Some(source) => self.decode(source).map(Some),
            None => Ok(None),
        }
    }

    fn assign(&self, view: &V, value: Option<&Arc<Artwork>>) {
        view.set_artwork(value.cloned());
    }
}

fn decode_error(error: image::ImageError) -> LibraryReadError {
    match error {
        image::ImageError::IoError(e) => LibraryReadError::Io(e),
        other => LibraryReadError::Decode(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::{BindTarget, ViewId};
    use image::{DynamicImage, ImageFormat, RgbaImage};
    use medley_cache::LruLibraryItemCache;
    use std::io::Cursor;
    use std::sync::Mutex;
    use std::thread;
    use std::time::{Duration, Instant};

    #[derive(Clone)]
    struct TextView {
        id: ViewId,
        text: Arc<Mutex<Option<String>>>,
    }

    impl TextView {
        fn new() -> Self {
            Self {
                id: ViewId::new(),
                text: Arc::new(Mutex::new(None)),
            }
        }

        fn text(&self) -> Option<String> {
            self.text.lock().unwrap().clone()
        }
    }

    impl BindTarget for TextView {
        fn view_id(&self) -> ViewId {
            self.id
        }
    }

    impl TextTarget for TextView {
        fn set_text(&self, text: Option<&str>) {
            *self.text.lock().unwrap() = text.map(|t| t.to_string());
        }
    }

    #[derive(Clone)]
    struct ImageView {
        id: ViewId,
        artwork: Arc<Mutex<Option<Arc<Artwork>>>>,
    }

    impl ImageView {
        fn new() -> Self {
            Self {
                id: ViewId::new(),
                artwork: Arc::new(Mutex::new(None)),
            }
        }

        fn artwork(&self) -> Option<Arc<Artwork>> {
            self.artwork.lock().unwrap().clone()
        }
    }

    impl BindTarget for ImageView {
        fn view_id(&self) -> ViewId {
            self.id
        }
    }

    impl ImageTarget for ImageView {
        fn set_artwork(&self, artwork: Option<Arc<Artwork>>) {
            *self.artwork.lock().unwrap() = artwork;
        }
    }

    struct StaticItem {
        id: ItemId,
        title: Option<String>,
        subtitle: Option<String>,
        artwork: Option<ArtworkSource>,
    }

    impl StaticItem {
        fn text(id: ItemId, title: &str, subtitle: &str) -> Arc<Self> {
            Arc::new(Self {
                id,
                title: Some(title.to_string()),
                subtitle: Some(subtitle.to_string()),
                artwork: None,
            })
        }

        fn with_artwork(id: ItemId, source: ArtworkSource) -> Arc<Self> {
            Arc::new(Self {
                id,
                title: None,
                subtitle: None,
                artwork: Some(source),
            })
        }
    }

    impl LibraryItem for StaticItem {
        fn id(&self) -> ItemId {
            self.id
        }

        fn title(&self) -> Result<Option<String>, LibraryReadError> {
            Ok(self.title.clone())
        }

        fn subtitle(&self) -> Result<Option<String>, LibraryReadError> {
            Ok(self.subtitle.clone())
        }

        fn artwork(&self) -> Result<Option<ArtworkSource>, LibraryReadError> {
            Ok(self.artwork.clone())
        }
    }

    fn shared_cache() -> Arc<LruLibraryItemCache> {
        Arc::new(LruLibraryItemCache::new(100, 100, 100).unwrap())
    }

    fn defaults() -> Arc<DisplayableDefaults> {
        Arc::new(DisplayableDefaults::new(
            Some("Untitled".to_string()),
            Some("Unknown artist".to_string()),
            None,
        ))
    }

    fn png_bytes(width: u32, height: u32) -> Arc<[u8]> {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        ));
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, ImageFormat::Png)
            .expect("failed to encode test PNG");
        buffer.into_inner().into()
    }

    fn settle_text(binder: &impl DataBinder<TextView>) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while binder.has_pending_work() {
            assert!(Instant::now() < deadline, "binder did not settle");
            binder.poll();
            thread::sleep(Duration::from_millis(2));
        }
        binder.poll();
    }

    fn settle_image(binder: &impl DataBinder<ImageView>) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while binder.has_pending_work() {
            assert!(Instant::now() < deadline, "binder did not settle");
            binder.poll();
            thread::sleep(Duration::from_millis(2));
        }
        binder.poll();
    }

    #[test]
    fn test_title_binder_default_then_value_then_cached() {
        let cache = shared_cache();
        let binder = TitleBinder::new(cache.clone(), defaults());
        let view = TextView::new();

        binder.bind(&view, StaticItem::text(1, "Blue Train", "John Coltrane"));
        assert_eq!(view.text(), Some("Untitled".to_string()));

        settle_text(&binder);
        assert_eq!(view.text(), Some("Blue Train".to_string()));

        // The computed title is now served synchronously from the cache
        use medley_cache::LibraryItemCache;
        assert_eq!(cache.title(1), Some("Blue Train".to_string()));

        let second = TextView::new();
        binder.bind(&second, StaticItem::text(1, "ignored", "ignored"));
        assert_eq!(second.text(), Some("Blue Train".to_string()));
        assert!(!binder.has_pending_work());
    }

    #[test]
    fn test_subtitle_binder_resolves_subtitle() {
        let binder = SubtitleBinder::new(shared_cache(), defaults());
        let view = TextView::new();

        binder.bind(&view, StaticItem::text(1, "Blue Train", "John Coltrane"));
        assert_eq!(view.text(), Some("Unknown artist".to_string()));

        settle_text(&binder);
        assert_eq!(view.text(), Some("John Coltrane".to_string()));
    }

    #[test]
    fn test_title_and_subtitle_use_independent_partitions() {
        let cache = shared_cache();
        let title_binder = TitleBinder::new(cache.clone(), defaults());
        let subtitle_binder = SubtitleBinder::new(cache.clone(), defaults());
        let title_view = TextView::new();
        let subtitle_view = TextView::new();
        let item = StaticItem::text(1, "Blue Train", "John Coltrane");

        title_binder.bind(&title_view, item.clone());
        subtitle_binder.bind(&subtitle_view, item);

        settle_text(&title_binder);
        settle_text(&subtitle_binder);

        assert_eq!(title_view.text(), Some("Blue Train".to_string()));
        assert_eq!(subtitle_view.text(), Some("John Coltrane".to_string()));
    }

    #[test]
    fn test_artwork_binder_decodes_encoded_bytes() {
        let binder = ArtworkBinder::new(shared_cache(), defaults(), 64);
        let view = ImageView::new();
        let item = StaticItem::with_artwork(1, ArtworkSource::Encoded(png_bytes(8, 8)));

        binder.bind(&view, item);
        settle_image(&binder);

        let artwork = view.artwork().expect("artwork should be bound");
        assert_eq!((artwork.width, artwork.height), (8, 8));
        assert_eq!(artwork.memory_size(), 8 * 8 * 4);
    }

    #[test]
    fn test_artwork_binder_downscales_to_decode_dimension() {
        let binder = ArtworkBinder::new(shared_cache(), defaults(), 16);
        let view = ImageView::new();
        let item = StaticItem::with_artwork(1, ArtworkSource::Encoded(png_bytes(64, 64)));

        binder.bind(&view, item);
        settle_image(&binder);

        let artwork = view.artwork().expect("artwork should be bound");
        assert!(artwork.width <= 16 && artwork.height <= 16);
    }

    #[test]
    fn test_artwork_binder_zero_dimension_keeps_native_size() {
        let binder = ArtworkBinder::new(shared_cache(), defaults(), 0);
        let view = ImageView::new();
        let item = StaticItem::with_artwork(1, ArtworkSource::Encoded(png_bytes(64, 32)));

        binder.bind(&view, item);
        settle_image(&binder);

        let artwork = view.artwork().expect("artwork should be bound");
        assert_eq!((artwork.width, artwork.height), (64, 32));
    }

    #[test]
    fn test_artwork_binder_reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cover.png");
        std::fs::write(&path, &png_bytes(8, 8)[..]).unwrap();

        let binder = ArtworkBinder::new(shared_cache(), defaults(), 64);
        let view = ImageView::new();
        let item = StaticItem::with_artwork(1, ArtworkSource::File(path));

        binder.bind(&view, item);
        settle_image(&binder);

        assert!(view.artwork().is_some());
    }

    #[test]
    fn test_artwork_decode_failure_keeps_default() {
        let default_artwork = Arc::new(Artwork::new(vec![0u8; 4 * 4 * 4], 4, 4));
        let defaults = Arc::new(DisplayableDefaults::new(
            None,
            None,
            Some(default_artwork.clone()),
        ));
        let cache = shared_cache();
        let binder = ArtworkBinder::new(cache.clone(), defaults, 64);
        let view = ImageView::new();
        let garbage: Arc<[u8]> = vec![0u8, 1, 2, 3].into();
        let item = StaticItem::with_artwork(1, ArtworkSource::Encoded(garbage));

        binder.bind(&view, item);
        settle_image(&binder);

        assert_eq!(view.artwork(), Some(default_artwork));

        use medley_cache::LibraryItemCache;
        assert!(cache.artwork(1).is_none());
    }

    #[test]
    fn test_artwork_binder_caches_decoded_bitmap() {
        let cache = shared_cache();
        let binder = ArtworkBinder::new(cache.clone(), defaults(), 64);
        let view = ImageView::new();
        let item = StaticItem::with_artwork(1, ArtworkSource::Encoded(png_bytes(8, 8)));

        binder.bind(&view, item);
        settle_image(&binder);

        // A second bind is served synchronously from the cache
        let second = ImageView::new();
        binder.bind(&second, StaticItem::with_artwork(1, ArtworkSource::Encoded(png_bytes(8, 8))));
        assert!(second.artwork().is_some());
        assert!(!binder.has_pending_work());
    }
}
