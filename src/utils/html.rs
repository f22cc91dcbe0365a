use ammonia;

/// Clean HTML content using the ammonia library.
///
/// Admin-submitted question text (enunciado, comando, comentario) may carry
/// markup pasted from exam PDFs; whitelist sanitization preserves safe tags
/// while stripping <script>, <iframe> and event-handler attributes before
/// the content reaches the database. Fail-safe against Stored XSS.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
