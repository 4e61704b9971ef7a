//! Internationalization (i18n) module for user-facing messages.

use crate::calibration::ReferenceKind;
use crate::workflow::Notice;

/// UI messages structure
#[derive(Debug, Clone)]
pub struct Messages {
    pub image_loaded: &'static str,
    pub analyzing: &'static str,
    pub reference_not_found: &'static str,
    pub analysis_error: &'static str,
    pub confirm_reference: &'static str,
    pub manual_adjust_unavailable: &'static str,
    pub enter_reference_size: &'static str,
    pub invalid_reference_size: &'static str,
    pub select_rect: &'static str,
    pub selection_too_small: &'static str,
    pub width: &'static str,
    pub height: &'static str,
    pub aspect_ratio: &'static str,
    pub aspect_undefined: &'static str,
    pub connection_successful: &'static str,
    pub connection_failed: &'static str,
    pub postbox: &'static str,
    pub intercom: &'static str,
    pub block: &'static str,
}

/// Japanese messages
pub static MESSAGES_JA: Messages = Messages {
    image_loaded: "画像が選択されました。解析を開始してください。",
    analyzing: "解析中...",
    reference_not_found: "基準物が検出されませんでした。別の画像を試してください。",
    analysis_error: "解析エラー",
    confirm_reference: "この枠は{}の位置で正しいですか？",
    manual_adjust_unavailable: "枠の修正機能は未実装です。",
    enter_reference_size: "基準物の実寸を入力してください",
    invalid_reference_size: "有効な幅と高さを入力してください",
    select_rect: "画像上でドラッグして矩形を選択してください",
    selection_too_small: "矩形が小さすぎます。もう一度選択してください。",
    width: "幅",
    height: "高さ",
    aspect_ratio: "縦横比",
    aspect_undefined: "算出不可",
    connection_successful: "バックエンドに接続済み",
    connection_failed: "バックエンドに接続できません",
    postbox: "ポスト",
    intercom: "ドアホン",
    block: "ブロック",
};

/// English messages
pub static MESSAGES_EN: Messages = Messages {
    image_loaded: "Image loaded. Start the analysis.",
    analyzing: "Analyzing...",
    reference_not_found: "No reference object was detected. Try another image.",
    analysis_error: "Analysis error",
    confirm_reference: "Is this box the {}?",
    manual_adjust_unavailable: "Adjusting the box manually is not implemented.",
    enter_reference_size: "Enter the real size of the reference object",
    invalid_reference_size: "Enter a valid width and height",
    select_rect: "Drag on the image to select a rectangle",
    selection_too_small: "Selection too small. Please select again.",
    width: "Width",
    height: "Height",
    aspect_ratio: "Aspect ratio",
    aspect_undefined: "undefined",
    connection_successful: "Connected to backend",
    connection_failed: "Cannot connect to backend",
    postbox: "postbox",
    intercom: "intercom",
    block: "block",
};

/// Get UI messages by language.
///
/// # Arguments
/// * `lang` - Language code, "ja" for Japanese, "en" for English.
///
/// # Returns
/// Reference to Messages struct.
pub fn get_messages(lang: &str) -> &'static Messages {
    match lang {
        "en" => &MESSAGES_EN,
        _ => &MESSAGES_JA,
    }
}

impl Messages {
    /// Display name of a reference kind; unknown kinds show their raw label.
    pub fn reference_name<'a>(&self, kind: &'a ReferenceKind) -> &'a str {
        match kind {
            ReferenceKind::Postbox => self.postbox,
            ReferenceKind::Intercom => self.intercom,
            ReferenceKind::Block => self.block,
            ReferenceKind::Other(label) => label,
        }
    }

    /// Confirmation prompt for a detected reference.
    pub fn confirm_prompt(&self, kind: &ReferenceKind) -> String {
        self.confirm_reference.replace("{}", self.reference_name(kind))
    }

    /// Text for a session notice.
    pub fn notice(&self, notice: &Notice) -> String {
        match notice {
            Notice::ReferenceNotFound => self.reference_not_found.to_string(),
            Notice::DetectionFailed(detail) => format!("{}: {}", self.analysis_error, detail),
            Notice::ManualAdjustUnavailable => self.manual_adjust_unavailable.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_messages() {
        let ja = get_messages("ja");
        assert_eq!(ja.postbox, "ポスト");

        let en = get_messages("en");
        assert_eq!(en.postbox, "postbox");

        // Unknown languages fall back to Japanese
        assert_eq!(get_messages("fr").block, "ブロック");
    }

    #[test]
    fn test_reference_names() {
        let ja = get_messages("ja");
        assert_eq!(ja.reference_name(&ReferenceKind::Intercom), "ドアホン");
        let other = ReferenceKind::from("gate");
        assert_eq!(ja.reference_name(&other), "gate");
        assert_eq!(
            ja.confirm_prompt(&ReferenceKind::Postbox),
            "この枠はポストの位置で正しいですか？"
        );
    }

    #[test]
    fn test_notice_text() {
        let en = get_messages("en");
        assert_eq!(
            en.notice(&Notice::DetectionFailed("HTTP 500".into())),
            "Analysis error: HTTP 500"
        );
        assert_eq!(
            en.notice(&Notice::ReferenceNotFound),
            en.reference_not_found
        );
    }
}
