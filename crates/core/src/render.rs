use crate::controller::RequestState;

pub const IDLE_TITLE: &str = "준비 완료";
pub const IDLE_CAPTION: &str =
    "왼쪽에서 내용을 입력하고 버튼을 누르면\nAI가 떡상 대본을 만들어드립니다.";
pub const LOADING_CAPTION: &str = "대본의 성공 비결을 훔치는 중...";
pub const ANALYSIS_TITLE: &str = "성공 요인 분석";
pub const SCRIPT_TITLE: &str = "NEW 대본";

/// What the result area shows for a given [`RequestState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    Placeholder {
        title: &'static str,
        caption: &'static str,
    },
    Loading {
        caption: &'static str,
    },
    /// Analysis panel first, then script. Both strings are shown as-is.
    Panels {
        analysis: &'a str,
        script: &'a str,
    },
    Banner {
        message: &'a str,
    },
}

pub fn render(state: &RequestState) -> ResultView<'_> {
    match state {
        RequestState::Idle => ResultView::Placeholder {
            title: IDLE_TITLE,
            caption: IDLE_CAPTION,
        },
        RequestState::Loading => ResultView::Loading {
            caption: LOADING_CAPTION,
        },
        RequestState::Success(result) => ResultView::Panels {
            analysis: &result.analysis,
            script: &result.script,
        },
        RequestState::Error(message) => ResultView::Banner { message },
    }
}
