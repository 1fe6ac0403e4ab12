//! HTML templates for the web interface.
//!
//! Plain server-rendered pages; labels stay in French to match the exported
//! CSV columns.

use crate::models::{ResultTable, PLACEHOLDER};
use crate::utils::html_escape;

/// Base HTML template shared by every page.
pub fn base_template(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - paaserp</title>
    <link rel="stylesheet" href="/static/style.css">
</head>
<body>
    <header id="main-header">
        <nav>
            <a href="/" class="logo">paaserp</a>
            <a href="/extract">extraire</a>
        </nav>
    </header>
    <main>
        <h1>{}</h1>
        {}
    </main>
</body>
</html>"#,
        html_escape(title),
        html_escape(title),
        content
    )
}

/// Landing page with the extract action.
pub fn index_page(repo: &str, path: &str) -> String {
    format!(
        r#"
    <p>Cette application lit <code>{}</code> depuis le dépôt
    <code>{}</code>, interroge SerpApi et affiche les blocs
    <em>People Also Ask</em> (PAA).</p>
    <p><a href="/extract" class="btn-action">Extraire les PAA</a></p>
    "#,
        html_escape(path),
        html_escape(repo)
    )
}

/// Results page: flat table, download links, then one collapsible section
/// per distinct query.
pub fn results_page(table: &ResultTable) -> String {
    let mut rows = String::new();
    for row in &table.rows {
        let source_cell = if row.source.is_empty() {
            String::new()
        } else {
            format!(
                r#"<a href="{}" target="_blank">{}</a>"#,
                html_escape(&row.source),
                html_escape(&row.source)
            )
        };

        rows.push_str(&format!(
            r#"
        <tr>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
        </tr>
        "#,
            html_escape(&row.query),
            html_escape(&row.question),
            html_escape(&row.answer),
            source_cell
        ));
    }

    let mut details = String::new();
    for (query, group) in table.grouped() {
        let mut entries = String::new();
        for row in &group {
            entries.push_str(&format!(
                "<p class=\"question\"><strong>Q :</strong> {}</p>",
                html_escape(&row.question)
            ));
            if row.answer != PLACEHOLDER {
                entries.push_str(&format!("<p>{}</p>", html_escape(&row.answer)));
            }
            if !row.source.is_empty() {
                entries.push_str(&format!(
                    r#"<p class="source"><a href="{}" target="_blank">{}</a></p>"#,
                    html_escape(&row.source),
                    html_escape(&row.source)
                ));
            }
            entries.push_str("<hr>");
        }

        details.push_str(&format!(
            r#"
        <details class="query-group">
            <summary>🔍 {} — {} questions</summary>
            {}
        </details>
        "#,
            html_escape(query),
            group.len(),
            entries
        ));
    }

    format!(
        r#"
    <div class="result-info">
        <span class="result-count">{} lignes, {} requêtes</span>
        <a href="/export.csv" class="btn-action">💾 Télécharger le CSV</a>
        <a href="/export.json" class="btn-small">JSON</a>
    </div>
    <table class="result-listing" id="result-table">
        <thead>
            <tr>
                <th>Requête</th>
                <th>Question PAA</th>
                <th>Réponse</th>
                <th>Source</th>
            </tr>
        </thead>
        <tbody>
            {}
        </tbody>
    </table>
    <h2>Détail par requête</h2>
    {}
    "#,
        table.len(),
        table.distinct_queries().len(),
        rows,
        details
    )
}

/// Error page for a failed query-file fetch.
pub fn error_page(message: &str) -> String {
    format!(
        r#"
    <div class="error-box">
        <p>Impossible de récupérer la liste de requêtes :</p>
        <pre>{}</pre>
        <p><a href="/">Retour</a></p>
    </div>
    "#,
        html_escape(message)
    )
}

/// CSS styles for the web interface - minimal text-based design.
pub const CSS: &str = include_str!("styles.css");
