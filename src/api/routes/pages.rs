//! Server-rendered landing page.
//!
//! The page is a static shell; its script fetches /components/ and renders
//! the grid client-side.

use axum::response::Html;

/// GET / - Component library landing page
pub async fn home() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Component Library</title>
    <style>
        body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }
        h1 { color: #333; }
        .grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 1rem; }
        .card { border: 1px solid #ddd; border-radius: 6px; padding: 1rem; }
        .card h2 { margin: 0 0 0.25rem; font-size: 1.1rem; }
        .meta { color: #666; font-size: 0.85rem; }
        .tag { display: inline-block; background: #eef; border-radius: 3px; padding: 0 0.4rem; margin-right: 0.25rem; font-size: 0.8rem; }
        .empty { color: #666; padding: 2rem 0; }
    </style>
</head>
<body>
    <h1>Component Library</h1>
    <div id="grid" class="grid"></div>
    <div id="empty" class="empty" hidden>No components yet.</div>
    <script>
        fetch('/components/')
            .then(function (resp) { return resp.json(); })
            .then(function (data) {
                var grid = document.getElementById('grid');
                if (!data.results.length) {
                    document.getElementById('empty').hidden = false;
                    return;
                }
                data.results.forEach(function (c) {
                    var card = document.createElement('div');
                    card.className = 'card';
                    var title = document.createElement('h2');
                    title.textContent = c.name;
                    var meta = document.createElement('div');
                    meta.className = 'meta';
                    meta.textContent = (c.section ? c.section + ' - ' : '') + c.dateISO + ' - ' + c.status;
                    card.appendChild(title);
                    card.appendChild(meta);
                    var tags = document.createElement('div');
                    c.tags.forEach(function (t) {
                        var tag = document.createElement('span');
                        tag.className = 'tag';
                        tag.textContent = t;
                        tags.appendChild(tag);
                    });
                    card.appendChild(tags);
                    grid.appendChild(card);
                });
            });
    </script>
</body>
</html>
"#,
    )
}
