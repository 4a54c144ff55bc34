use serde_json::{Value, json};

use crate::types::GenerationRequest;

/// Sampling temperature sent with every call. Not user-configurable.
pub const TEMPERATURE: f64 = 0.7;

pub static SYSTEM_INSTRUCTION: &str = r#"
  당신은 세계 최고의 유튜브 대본 컨설턴트이자 전문 작가입니다.
  사용자가 제공한 '성공한 영상의 대본(Original Transcript)'을 깊이 분석하여
  시청 지속 시간을 끌어올리는 요소(후킹, 스토리텔링 구조, 호흡, 말투, 반전 등)를 찾아내십시오.
  그 다음, 분석한 구조와 스타일을 그대로 적용해 사용자가 원하는 '새로운 주제(New Topic)'에 맞는
  완성도 높은 대본을 작성하십시오.

  결과는 반드시 한국어로 작성해야 합니다.
"#;

const ANALYSIS_DESCRIPTION: &str = "원본 대본의 성공 요인 분석 (후킹, 구조, 톤앤매너 등)";
const SCRIPT_DESCRIPTION: &str = "새로운 주제로 작성된 완성된 대본";

/// User prompt with both inputs embedded verbatim under labeled sections.
pub fn build_prompt(request: &GenerationRequest) -> String {
    format!(
        r#"
  ### 원본 대본 (Original Transcript):
  {transcript}

  ### 새로운 주제 (New Topic):
  {topic}

  ### 요청 사항:
  1. 원본 대본이 왜 성공했는지 핵심 요소를 분석하세요 (분석 내용은 'analysis' 필드에).
  2. 그 성공 공식을 적용해 새로운 주제의 유튜브 대본을 작성하세요 (대본 내용은 'script' 필드에).
  3. 대본은 오프닝(Hook), 본론(Body), 결론/CTA(Outro) 구조를 분명히 갖추되, 원본의 분위기를 살리세요.
"#,
        transcript = request.reference_transcript(),
        topic = request.new_topic(),
    )
}

/// `responseSchema` for Gemini (OpenAPI subset, upper-case type names).
pub fn gemini_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": {
                "type": "STRING",
                "description": ANALYSIS_DESCRIPTION,
            },
            "script": {
                "type": "STRING",
                "description": SCRIPT_DESCRIPTION,
            },
        },
        "required": ["analysis", "script"],
    })
}

/// Strict JSON Schema for chat-completions `response_format`.
pub fn json_response_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "analysis": {
                "type": "string",
                "description": ANALYSIS_DESCRIPTION,
            },
            "script": {
                "type": "string",
                "description": SCRIPT_DESCRIPTION,
            },
        },
        "required": ["analysis", "script"],
        "additionalProperties": false,
    })
}
