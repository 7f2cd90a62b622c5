//! Now-playing track panel.
//!
//! Shows the current track's artwork, title, album, and artist. The player
//! usually embeds a small thumbnail in its metadata; an optional
//! [`AlbumArtSource`] upgrades it to full resolution. Lookups are keyed by
//! track title, so a source is consulted once per track rather than once per
//! poll tick.

use std::future::{ready, Ready};
use std::sync::Arc;

use crate::color::Rgba;
use crate::scene::Scene;

const PAD: f64 = 8.0;
const ART_FRACTION: f64 = 0.7;
const TITLE_COLOR: Rgba = Rgba::WHITE;
const ALBUM_COLOR: Rgba = Rgba::rgb(0xaa, 0xaa, 0xaa);
const ARTIST_COLOR: Rgba = Rgba::rgb(0xcc, 0xcc, 0xcc);
const SCRIM_OPACITY: f64 = 0.55;

/// Track metadata as reported by the media player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Base64-encoded thumbnail embedded in the player's metadata.
    pub album_art: Option<String>,
}

/// Resolves full-resolution artwork for a track.
///
/// Implementations typically query a cover-art service; the synthetic
/// sources used in demos return canned URLs.
pub trait AlbumArtSource: Send + Sync {
    /// Look up a full-resolution artwork URL, if one exists.
    fn high_res(&self, title: &str, artist: &str) -> Option<String>;
}

/// A track plus its resolved artwork, ready to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackDisplay {
    pub metadata: TrackMetadata,
    /// Full-resolution artwork URL, when a source resolved one.
    pub high_res_art: Option<String>,
}

impl TrackDisplay {
    /// Artwork reference for rendering.
    ///
    /// Tracks without an embedded thumbnail render no artwork at all, even
    /// when a high-resolution URL is known; the embedded art is what proves
    /// the player actually has a picture for this track.
    #[must_use]
    pub fn art_href(&self) -> Option<String> {
        let embedded = self.metadata.album_art.as_ref()?;
        Some(match &self.high_res_art {
            Some(url) => url.clone(),
            None => format!("data:image/jpeg;base64,{embedded}"),
        })
    }
}

/// Poll transform that attaches resolved artwork to raw track metadata.
///
/// A `None` source disables lookups entirely. A failed poll yields `None`,
/// leaving the previously published track on screen.
pub fn art_resolving_transform(
    source: Option<Arc<dyn AlbumArtSource>>,
) -> impl FnMut(Option<TrackMetadata>) -> Ready<Option<TrackDisplay>> {
    let mut resolved: Option<(String, Option<String>)> = None;

    move |raw| {
        let Some(metadata) = raw else {
            return ready(None);
        };

        if let Some(source) = &source {
            let changed = resolved.as_ref().map_or(true, |(title, _)| *title != metadata.title);
            if changed {
                let art = source.high_res(&metadata.title, &metadata.artist);
                resolved = Some((metadata.title.clone(), art));
            }
        }

        let high_res_art = resolved.as_ref().and_then(|(_, art)| art.clone());
        ready(Some(TrackDisplay { metadata, high_res_art }))
    }
}

/// View model for the now-playing widget.
#[derive(Debug, Clone, Default)]
pub struct MediaPanel {
    blur: bool,
}

impl MediaPanel {
    /// Create the widget with the backdrop blur disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the blurred artwork backdrop.
    #[must_use]
    pub fn blur(mut self, enabled: bool) -> Self {
        self.blur = enabled;
        self
    }

    /// Build the scene; no track renders an empty panel.
    #[must_use]
    pub fn scene(&self, width: f64, height: f64, track: Option<&TrackDisplay>) -> Scene {
        let mut scene = Scene::new(width, height);
        let Some(track) = track else {
            return scene;
        };

        let art = track.art_href();
        if self.blur {
            if let Some(href) = &art {
                scene = scene
                    .image(0.0, 0.0, width, height, href.clone())
                    .rect_faded(0.0, 0.0, width, height, Rgba::BLACK, SCRIM_OPACITY);
            }
        }

        let mut text_x = PAD;
        if let Some(href) = art {
            let size = height * ART_FRACTION;
            scene = scene.image(PAD, (height - size) / 2.0, size, size, href);
            text_x += size + 12.0;
        }

        scene
            .text(text_x, height * 0.40, &*track.metadata.title, 14.0, TITLE_COLOR)
            .text(text_x, height * 0.55, &*track.metadata.album, 11.0, ALBUM_COLOR)
            .text(text_x, height * 0.70, &*track.metadata.artist, 12.0, ARTIST_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneElement;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn track(title: &str, art: Option<&str>) -> TrackMetadata {
        TrackMetadata {
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: "Album".to_string(),
            album_art: art.map(str::to_string),
        }
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn new() -> Arc<Self> {
            Arc::new(Self { calls: AtomicUsize::new(0) })
        }
    }

    impl AlbumArtSource for CountingSource {
        fn high_res(&self, title: &str, _artist: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(format!("https://art.example/{title}"))
        }
    }

    #[test]
    fn test_art_href_prefers_high_res() {
        let display = TrackDisplay {
            metadata: track("Song", Some("QUJD")),
            high_res_art: Some("https://art.example/Song".to_string()),
        };
        assert_eq!(display.art_href().as_deref(), Some("https://art.example/Song"));
    }

    #[test]
    fn test_art_href_falls_back_to_data_uri() {
        let display = TrackDisplay { metadata: track("Song", Some("QUJD")), high_res_art: None };
        assert_eq!(display.art_href().as_deref(), Some("data:image/jpeg;base64,QUJD"));
    }

    #[test]
    fn test_art_href_requires_embedded_thumbnail() {
        let display = TrackDisplay {
            metadata: track("Song", None),
            high_res_art: Some("https://art.example/Song".to_string()),
        };
        assert_eq!(display.art_href(), None);
    }

    #[tokio::test]
    async fn test_lookup_happens_once_per_title() {
        let source = CountingSource::new();
        let mut transform =
            art_resolving_transform(Some(source.clone() as Arc<dyn AlbumArtSource>));

        for _ in 0..5 {
            let out = transform(Some(track("Song", Some("QUJD")))).await.unwrap();
            assert_eq!(out.high_res_art.as_deref(), Some("https://art.example/Song"));
        }
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        transform(Some(track("Next", Some("QUJD")))).await.unwrap();
        assert_eq!(source.calls.load(Ordering::SeqCst), 2, "title change re-resolves");
    }

    #[tokio::test]
    async fn test_failed_poll_maps_to_retention() {
        let source = CountingSource::new();
        let mut transform =
            art_resolving_transform(Some(source.clone() as Arc<dyn AlbumArtSource>));

        transform(Some(track("Song", Some("QUJD")))).await.unwrap();
        assert_eq!(transform(None).await, None, "publication is withheld, not cleared");
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_disabled_source_never_resolves() {
        let mut transform = art_resolving_transform(None);
        let out = transform(Some(track("Song", Some("QUJD")))).await.unwrap();
        assert_eq!(out.high_res_art, None);
        assert_eq!(out.art_href().as_deref(), Some("data:image/jpeg;base64,QUJD"));
    }

    fn count_images(scene: &Scene) -> usize {
        scene
            .elements()
            .iter()
            .filter(|e| matches!(e, SceneElement::Image { .. }))
            .count()
    }

    #[test]
    fn test_scene_empty_without_track() {
        let scene = MediaPanel::new().scene(300.0, 100.0, None);
        assert!(scene.elements().is_empty());
    }

    #[test]
    fn test_scene_blur_adds_backdrop_and_scrim() {
        let display = TrackDisplay { metadata: track("Song", Some("QUJD")), high_res_art: None };

        let plain = MediaPanel::new().scene(300.0, 100.0, Some(&display));
        assert_eq!(count_images(&plain), 1);

        let blurred = MediaPanel::new().blur(true).scene(300.0, 100.0, Some(&display));
        assert_eq!(count_images(&blurred), 2);
        assert!(
            blurred
                .elements()
                .iter()
                .any(|e| matches!(e, SceneElement::Rect { opacity, .. } if *opacity < 1.0)),
            "scrim darkens the backdrop"
        );
    }

    #[test]
    fn test_scene_without_art_keeps_text_at_left_edge() {
        let display = TrackDisplay { metadata: track("Song", None), high_res_art: None };
        let scene = MediaPanel::new().blur(true).scene(300.0, 100.0, Some(&display));

        assert_eq!(count_images(&scene), 0);
        let text_xs: Vec<f64> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Text { x, .. } => Some(*x),
                _ => None,
            })
            .collect();
        assert_eq!(text_xs, vec![PAD, PAD, PAD]);
    }

    #[test]
    fn test_scene_text_labels() {
        let display = TrackDisplay { metadata: track("Song", Some("QUJD")), high_res_art: None };
        let scene = MediaPanel::new().scene(300.0, 100.0, Some(&display));

        let labels: Vec<String> = scene
            .elements()
            .iter()
            .filter_map(|e| match e {
                SceneElement::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Song", "Album", "Artist"]);
    }
}
