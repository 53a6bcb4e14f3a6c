//! Region visibility and copy derived from engine and tab.

use crate::workspace::pane::PaneSide;
use crate::workspace::{Engine, VisualTab};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolGroup {
    Text,
    Understanding,
    ImageGen,
    VideoGen,
}

impl ToolGroup {
    pub fn for_mode(engine: Engine, visual_tab: VisualTab) -> Self {
        match (engine, visual_tab) {
            (Engine::Text, _) => Self::Text,
            (Engine::Visual, VisualTab::Understanding) => Self::Understanding,
            (Engine::Visual, VisualTab::ImageGen) => Self::ImageGen,
            (Engine::Visual, VisualTab::VideoGen) => Self::VideoGen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub show_sub_tabs: bool,
    pub show_upload_zone: bool,
    pub upload_zone_single_mode: bool,
    pub image_gen_upload_style: bool,
    pub show_video_upload_option: bool,
    pub show_video_frame_zones: bool,
    pub show_compare_toggle: bool,
    pub visible_tool_group: ToolGroup,
}

impl Visibility {
    pub fn derive(engine: Engine, visual_tab: VisualTab) -> Self {
        let is_text = engine == Engine::Text;
        let tab = (!is_text).then_some(visual_tab);

        let show_upload_zone = is_text
            || matches!(tab, Some(VisualTab::Understanding | VisualTab::ImageGen));
        let upload_zone_single_mode = is_text || tab == Some(VisualTab::ImageGen);

        Self {
            show_sub_tabs: !is_text,
            show_upload_zone,
            upload_zone_single_mode,
            image_gen_upload_style: tab == Some(VisualTab::ImageGen),
            show_video_upload_option: show_upload_zone && !upload_zone_single_mode,
            show_video_frame_zones: tab == Some(VisualTab::VideoGen),
            show_compare_toggle: is_text,
            visible_tool_group: ToolGroup::for_mode(engine, visual_tab),
        }
    }
}

pub fn welcome_title(engine: Engine, side: PaneSide) -> &'static str {
    match (engine, side) {
        (_, PaneSide::B) => "Compare model (B)",
        (Engine::Text, PaneSide::A) => "Welcome to the text model workspace",
        (Engine::Visual, PaneSide::A) => "Welcome to the visual model workspace",
    }
}

pub fn composer_placeholder(engine: Engine, visual_tab: VisualTab) -> &'static str {
    match ToolGroup::for_mode(engine, visual_tab) {
        ToolGroup::Text => "Type text to start a conversation...",
        ToolGroup::Understanding => "Drop an image or video and ask a question...",
        ToolGroup::ImageGen => "Describe the image to generate (reference images supported)...",
        ToolGroup::VideoGen => "Describe the video to generate...",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_engine_regions() {
        for tab in VisualTab::ALL {
            let v = Visibility::derive(Engine::Text, tab);
            assert!(!v.show_sub_tabs);
            assert!(v.show_compare_toggle);
            assert!(v.show_upload_zone);
            assert!(v.upload_zone_single_mode);
            assert!(!v.show_video_upload_option);
            assert!(!v.show_video_frame_zones);
            assert_eq!(v.visible_tool_group, ToolGroup::Text);
        }
    }

    #[test]
    fn visual_engine_regions_per_tab() {
        let understanding = Visibility::derive(Engine::Visual, VisualTab::Understanding);
        assert!(understanding.show_sub_tabs);
        assert!(!understanding.show_compare_toggle);
        assert!(understanding.show_upload_zone);
        assert!(!understanding.upload_zone_single_mode);
        assert!(understanding.show_video_upload_option);
        assert_eq!(understanding.visible_tool_group, ToolGroup::Understanding);

        let image = Visibility::derive(Engine::Visual, VisualTab::ImageGen);
        assert!(image.show_upload_zone);
        assert!(image.upload_zone_single_mode);
        assert!(image.image_gen_upload_style);
        assert!(!image.show_video_frame_zones);
        assert_eq!(image.visible_tool_group, ToolGroup::ImageGen);

        let video = Visibility::derive(Engine::Visual, VisualTab::VideoGen);
        assert!(!video.show_upload_zone);
        assert!(video.show_video_frame_zones);
        assert!(!video.show_video_upload_option);
        assert_eq!(video.visible_tool_group, ToolGroup::VideoGen);
    }

    #[test]
    fn copy_follows_mode() {
        assert_eq!(
            composer_placeholder(Engine::Text, VisualTab::VideoGen),
            "Type text to start a conversation..."
        );
        assert_eq!(welcome_title(Engine::Text, PaneSide::B), "Compare model (B)");
        assert_eq!(
            welcome_title(Engine::Visual, PaneSide::A),
            "Welcome to the visual model workspace"
        );
    }
}
