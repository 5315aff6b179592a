//! Backend endpoint paths, relative to the API base URL.

use url::Url;

// ============================================================================
// Authentication
// ============================================================================

pub const AUTH_LOGIN: &str = "/auth/login";
pub const AUTH_SIGNUP: &str = "/auth/signup";
pub const AUTH_REFRESH: &str = "/auth/refresh";
pub const AUTH_LOGOUT: &str = "/auth/logout";
pub const AUTH_ME: &str = "/auth/me";
pub const AUTH_CHANGE_PASSWORD: &str = "/auth/change-password";
pub const AUTH_CHANGE_NICKNAME: &str = "/auth/change-nickname";
pub const AUTH_FIND_USERNAME: &str = "/auth/find-username";
pub const AUTH_FIND_PASSWORD: &str = "/auth/find-password";

// ============================================================================
// Resources
// ============================================================================

pub const ALLERGIES: &str = "allergies";
pub const MEDICINE: &str = "medicine";
pub const MEDICINE_SEARCH: &str = "/medicine/search";
pub const MEDICATIONS_BATCH: &str = "/medications/search/batch";
pub const ANALYSIS: &str = "analysis";
pub const ANALYSIS_SYMPTOM: &str = "/analysis/symptom";
pub const ANALYSIS_SIDE_EFFECT: &str = "/analysis/side-effect";
pub const OCR_ANALYZE: &str = "/ocr/analyze";
pub const POSTS: &str = "posts";
pub const POST_IMAGES: &str = "/posts/images";
pub const COMMENTS: &str = "comments";

/// Join path segments, percent-encoding each one.
///
/// ```text
/// path(&["allergies", "a/b"]) == "/allergies/a%2Fb"
/// ```
pub fn path(segments: &[&str]) -> String {
    let mut url = Url::parse("http://localhost/").expect("static URL is valid");
    url.path_segments_mut()
        .expect("http URLs have path segments")
        .clear()
        .extend(segments);
    url.path().to_string()
}
