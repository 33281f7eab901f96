use axum::response::Html;

const INDEX_PAGE: &str = include_str!("../../templates/index.html");
const FORM_PAGE: &str = include_str!("../../templates/form.html");

/// GET / - notes board; the page loads its data from /api/notes
pub async fn index() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// GET /notes/form - create/edit form, `?id=` switches it to edit mode client-side
pub async fn note_form() -> Html<&'static str> {
    Html(FORM_PAGE)
}
