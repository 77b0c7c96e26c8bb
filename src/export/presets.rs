//! Platform export presets
//!
//! Static catalog of output sizes per social platform, plus the derived
//! values the exporter needs: filenames, pixel sizes at a multiplier and
//! rough file size estimates.

use serde::Serialize;

use super::options::{ExportFormat, ImageExportOptions};

/// Social platform a preset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Instagram,
    Facebook,
    Twitter,
    Youtube,
    Linkedin,
    Pinterest,
    Tiktok,
    NaverBlog,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Platform::Instagram,
        Platform::Facebook,
        Platform::Twitter,
        Platform::Youtube,
        Platform::Linkedin,
        Platform::Pinterest,
        Platform::Tiktok,
        Platform::NaverBlog,
    ];

    /// Identifier used in filenames and archive folders
    pub fn id(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Youtube => "youtube",
            Platform::Linkedin => "linkedin",
            Platform::Pinterest => "pinterest",
            Platform::Tiktok => "tiktok",
            Platform::NaverBlog => "naver_blog",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "X (Twitter)",
            Platform::Youtube => "YouTube",
            Platform::Linkedin => "LinkedIn",
            Platform::Pinterest => "Pinterest",
            Platform::Tiktok => "TikTok",
            Platform::NaverBlog => "Naver Blog",
        }
    }

    pub fn from_id(id: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| p.id() == id)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// One fixed output size for a platform placement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformExportPreset {
    pub id: &'static str,
    pub platform: Platform,
    pub name: &'static str,
    pub description: &'static str,
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: &'static str,
    pub icon: &'static str,
}

macro_rules! preset {
    ($id:expr, $platform:ident, $name:expr, $desc:expr, $w:expr, $h:expr, $ratio:expr, $icon:expr) => {
        PlatformExportPreset {
            id: $id,
            platform: Platform::$platform,
            name: $name,
            description: $desc,
            width: $w,
            height: $h,
            aspect_ratio: $ratio,
            icon: $icon,
        }
    };
}

/// Every known preset, grouped by platform in catalog order.
pub static PLATFORM_PRESETS: &[PlatformExportPreset] = &[
    preset!("instagram-feed-square", Instagram, "Feed Square", "정사각형 피드 게시물", 1080, 1080, "1:1", "square"),
    preset!("instagram-feed-portrait", Instagram, "Feed Portrait", "세로형 피드 게시물", 1080, 1350, "4:5", "portrait"),
    preset!("instagram-feed-landscape", Instagram, "Feed Landscape", "가로형 피드 게시물", 1080, 566, "1.91:1", "landscape"),
    preset!("instagram-story", Instagram, "Story", "스토리 / 릴스 커버", 1080, 1920, "9:16", "story"),
    preset!("facebook-feed", Facebook, "Feed", "피드 게시물", 1200, 630, "1.91:1", "landscape"),
    preset!("facebook-story", Facebook, "Story", "스토리", 1080, 1920, "9:16", "story"),
    preset!("facebook-cover", Facebook, "Cover", "페이지 커버", 820, 312, "2.63:1", "banner"),
    preset!("twitter-post", Twitter, "Post", "타임라인 이미지", 1600, 900, "16:9", "landscape"),
    preset!("twitter-header", Twitter, "Header", "프로필 헤더", 1500, 500, "3:1", "banner"),
    preset!("youtube-thumbnail", Youtube, "Thumbnail", "동영상 썸네일", 1280, 720, "16:9", "thumbnail"),
    preset!("youtube-banner", Youtube, "Channel Banner", "채널 아트", 2560, 1440, "16:9", "banner"),
    preset!("linkedin-post", Linkedin, "Post", "피드 게시물", 1200, 627, "1.91:1", "landscape"),
    preset!("linkedin-link", Linkedin, "Link Preview", "링크 미리보기", 1200, 628, "1.91:1", "link"),
    preset!("pinterest-pin", Pinterest, "Standard Pin", "표준 핀", 1000, 1500, "2:3", "portrait"),
    preset!("tiktok-cover", Tiktok, "Video Cover", "동영상 커버", 1080, 1920, "9:16", "story"),
    preset!("naver-blog-thumbnail", NaverBlog, "Thumbnail", "블로그 대표 이미지", 750, 750, "1:1", "thumbnail"),
];

/// Presets of one platform, in catalog order.
pub fn presets_for_platform(platform: Platform) -> Vec<&'static PlatformExportPreset> {
    PLATFORM_PRESETS
        .iter()
        .filter(|p| p.platform == platform)
        .collect()
}

/// Look up a preset by id.
pub fn preset_by_id(id: &str) -> Option<&'static PlatformExportPreset> {
    PLATFORM_PRESETS.iter().find(|p| p.id == id)
}

/// Every preset id in catalog order.
pub fn all_preset_ids() -> Vec<&'static str> {
    PLATFORM_PRESETS.iter().map(|p| p.id).collect()
}

/// Target pixel size of a preset at a resolution multiplier.
pub fn calculate_export_dimensions(preset: &PlatformExportPreset, multiplier: u32) -> (u32, u32) {
    (preset.width * multiplier, preset.height * multiplier)
}

/// Replace every character outside `[A-Za-z0-9_-]` with an underscore.
pub fn sanitize_filename(base: &str) -> String {
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn hyphenate(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Filename of one exported image:
/// `{base}_{platform}_{preset-name}[@{m}x].{ext}`.
pub fn generate_export_filename(
    base: &str,
    preset: &PlatformExportPreset,
    options: &ImageExportOptions,
) -> String {
    let scale = if options.multiplier > 1 {
        format!("@{}x", options.multiplier)
    } else {
        String::new()
    };
    format!(
        "{}_{}_{}{}.{}",
        sanitize_filename(base),
        preset.platform.id(),
        hyphenate(preset.name),
        scale,
        options.format.extension()
    )
}

fn bytes_per_pixel(format: ExportFormat, quality: u8) -> f64 {
    let q = f64::from(quality.clamp(1, 100)) / 100.0;
    match format {
        ExportFormat::Png => 1.2,
        ExportFormat::Jpeg => 0.05 + 0.25 * q,
        ExportFormat::Webp => 0.04 + 0.16 * q,
    }
}

/// Rough encoded size in bytes. Display only.
pub fn estimate_file_size(preset: &PlatformExportPreset, options: &ImageExportOptions) -> u64 {
    let (width, height) = calculate_export_dimensions(preset, options.multiplier);
    let pixels = f64::from(width) * f64::from(height);
    (pixels * bytes_per_pixel(options.format, options.quality)).round() as u64
}

/// Human-readable size, e.g. `512 B`, `12.3 KB`, `4.0 MB`.
pub fn format_file_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = 1024.0 * 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{} B", bytes)
    } else if value < MB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use test_case::test_case;

    fn square() -> &'static PlatformExportPreset {
        preset_by_id("instagram-feed-square").unwrap()
    }

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = all_preset_ids().into_iter().collect();
        assert_eq!(ids.len(), PLATFORM_PRESETS.len());
    }

    #[test]
    fn test_every_platform_has_presets() {
        for platform in Platform::ALL {
            assert!(!presets_for_platform(platform).is_empty(), "{}", platform);
            assert_eq!(Platform::from_id(platform.id()), Some(platform));
        }
    }

    #[test]
    fn test_unknown_preset() {
        assert!(preset_by_id("myspace-banner").is_none());
    }

    #[test_case(1, (1080, 1080) ; "1x")]
    #[test_case(2, (2160, 2160) ; "2x")]
    #[test_case(3, (3240, 3240) ; "3x")]
    fn test_dimensions(multiplier: u32, expected: (u32, u32)) {
        assert_eq!(calculate_export_dimensions(square(), multiplier), expected);
    }

    #[test]
    fn test_filename_plain() {
        let options = ImageExportOptions::default();
        assert_eq!(
            generate_export_filename("spring sale!", square(), &options),
            "spring_sale__instagram_feed-square.png"
        );
    }

    #[test]
    fn test_filename_with_multiplier_and_jpeg() {
        let options = ImageExportOptions {
            format: ExportFormat::Jpeg,
            multiplier: 2,
            ..Default::default()
        };
        assert_eq!(
            generate_export_filename("promo", preset_by_id("youtube-banner").unwrap(), &options),
            "promo_youtube_channel-banner@2x.jpg"
        );
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize_filename("봄-sale_1"), "_-sale_1");
    }

    #[test]
    fn test_estimate_scales_with_quality() {
        let low = ImageExportOptions {
            format: ExportFormat::Jpeg,
            quality: 10,
            ..Default::default()
        };
        let high = ImageExportOptions { quality: 100, ..low };
        assert!(estimate_file_size(square(), &low) < estimate_file_size(square(), &high));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(2048), "2.0 KB");
        assert_eq!(format_file_size(3 * 1024 * 1024), "3.0 MB");
    }
}
