use base64::Engine;
use streamscribe::{
    AudioEncoding, ClientMessage, RecognitionResult, ServerMessage, StreamingConfig,
};

#[test]
fn test_client_control_messages() {
    let start: ClientMessage = serde_json::from_str(r#"{"type":"start"}"#).unwrap();
    assert!(matches!(start, ClientMessage::Start));

    let stop: ClientMessage = serde_json::from_str(r#"{"type":"stop"}"#).unwrap();
    assert!(matches!(stop, ClientMessage::Stop));
}

#[test]
fn test_client_audio_message_carries_base64_pcm() {
    let samples: Vec<i16> = vec![100, -200, 300, -400];
    let pcm_bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let encoded = base64::engine::general_purpose::STANDARD.encode(&pcm_bytes);

    let json = format!(r#"{{"type":"audio","audio":"{}"}}"#, encoded);
    let message: ClientMessage = serde_json::from_str(&json).unwrap();

    match message {
        ClientMessage::Audio { audio } => {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(audio)
                .unwrap();
            assert_eq!(decoded, pcm_bytes);
        }
        other => panic!("expected audio message, got {:?}", other),
    }
}

#[test]
fn test_transcript_message_field_spelling() {
    // The browser client reads `isFinal`, not `is_final`.
    let message = ServerMessage::Transcript {
        text: "こんにちは".to_string(),
        is_final: true,
    };

    let json = serde_json::to_string(&message).unwrap();
    assert!(json.contains("\"type\":\"transcript\""));
    assert!(json.contains("\"isFinal\":true"));
    assert!(!json.contains("is_final"));

    let roundtrip: ServerMessage = serde_json::from_str(&json).unwrap();
    let ServerMessage::Transcript { text, is_final } = roundtrip;
    assert_eq!(text, "こんにちは");
    assert!(is_final);
}

#[test]
fn test_streaming_config_serialization() {
    let config = StreamingConfig {
        encoding: AudioEncoding::Linear16,
        sample_rate_hertz: 16000,
        audio_channel_count: 1,
        language_code: "ja-JP".to_string(),
        model: None,
        enable_automatic_punctuation: true,
        interim_results: true,
    };

    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains("\"encoding\":\"LINEAR16\""));
    assert!(json.contains("\"sample_rate_hertz\":16000"));
    assert!(json.contains("\"language_code\":\"ja-JP\""));
    // absent model is omitted, not serialized as null
    assert!(!json.contains("model"));
}

#[test]
fn test_recognition_result_deserialization() {
    let json = r#"{
        "alternatives": [
            {"transcript": "hello world", "confidence": 0.95},
            {"transcript": "hollow world"}
        ],
        "is_final": true
    }"#;

    let result: RecognitionResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.alternatives.len(), 2);
    assert_eq!(result.alternatives[0].transcript, "hello world");
    assert_eq!(result.alternatives[0].confidence, Some(0.95));
    assert_eq!(result.alternatives[1].confidence, None);
    assert!(result.is_final);
}

#[test]
fn test_recognition_result_defaults() {
    // Services occasionally send empty keep-alive results; both fields
    // default rather than fail.
    let result: RecognitionResult = serde_json::from_str("{}").unwrap();
    assert!(result.alternatives.is_empty());
    assert!(!result.is_final);
}
