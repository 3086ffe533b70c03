#![no_main]

use libfuzzer_sys::fuzz_target;
use solace::mood::{distribution, MoodEntry};
use solace::sessions::{dominant_sentiment, Session};

fuzz_target!(|data: &[u8]| {
    if let Ok(sessions) = serde_json::from_slice::<Vec<Session>>(data) {
        for session in &sessions {
            let _ = dominant_sentiment(&session.messages);
            let _ = session.preview();
            let _ = serde_json::to_vec(session);
        }
    }
    if let Ok(entries) = serde_json::from_slice::<Vec<MoodEntry>>(data) {
        let _ = distribution(&entries);
    }
});
