//! Server-rendered HTML views: composer, listing and message detail.
//!
//! Every view reads the repository afresh on each request. Interactive bits
//! (share, pin, delete, copy) are small inline scripts that call the JSON API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use clipshare_types::models::Message;

use crate::error::ApiError;
use crate::ids::parse_timestamp;
use crate::state::{AppState, run_blocking};

const APP_NAME: &str = "ClipShare";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Home,
    Messages,
}

/// GET /
pub async fn composer(State(state): State<AppState>) -> Html<String> {
    Html(render_composer(state.link_base()))
}

/// GET /messages
pub async fn listing(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let messages = run_blocking(&state, |repo| repo.list()).await?;
    Ok(Html(render_listing(&messages)))
}

/// GET /message/{id}
pub async fn message_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let found = run_blocking(&state, move |repo| repo.find_by_id(&id)).await?;
    Ok(detail_response(found, state.link_base()))
}

/// GET /m/{slug}
pub async fn message_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, ApiError> {
    let found = run_blocking(&state, move |repo| repo.find_by_slug(&slug)).await?;
    Ok(detail_response(found, state.link_base()))
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render_not_found())).into_response()
}

fn detail_response(found: Option<Message>, link_base: &str) -> Response {
    match found {
        Some(message) => Html(render_detail(&message, link_base)).into_response(),
        None => (StatusCode::NOT_FOUND, Html(render_not_found())).into_response(),
    }
}

/// Pinned items first. Both groups keep their incoming order.
pub fn pinned_first<T>(items: impl IntoIterator<Item = T>, is_pinned: impl Fn(&T) -> bool) -> Vec<T> {
    let (mut pinned, unpinned): (Vec<_>, Vec<_>) = items.into_iter().partition(|item| is_pinned(item));
    pinned.extend(unpinned);
    pinned
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// "Shared on" date, e.g. `Mar 14, 2025 09:30`. Unparseable timestamps are
/// shown as stored.
pub fn format_shared_on(timestamp: &str) -> String {
    match parse_timestamp(timestamp) {
        Some(at) => at.format("%b %-d, %Y %H:%M").to_string(),
        None => timestamp.to_string(),
    }
}

// ── Rendering ───────────────────────────────────────────────────────────

fn layout(title: &str, current: View, main: &str, script: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="page">
{nav}
{main}
</div>
<script>{script}</script>
</body>
</html>
"#,
        title = escape_html(title),
        nav = render_nav(current),
        main = main,
        script = script,
    )
}

fn render_nav(current: View) -> String {
    let class = |view: View| if view == current { "nav-link active" } else { "nav-link" };
    format!(
        r#"<nav class="nav"><h1 class="brand">{APP_NAME}</h1><div><a class="{home}" href="/">Home</a><a class="{messages}" href="/messages">Messages</a></div></nav>"#,
        home = class(View::Home),
        messages = class(View::Messages),
    )
}

pub fn render_composer(link_base: &str) -> String {
    let main = format!(
        r#"<main class="narrow" data-link-base="{link_base}" id="composer">
<label class="label" for="content">New Message</label>
<textarea id="content" class="editor" placeholder="Paste your content here..." autofocus></textarea>
<button id="share" class="primary wide">Share</button>
<section id="links" class="links" hidden>
  <label class="label-sm" for="hash-link">Hash Link</label>
  <div class="row"><input id="hash-link" readonly><button data-copy="hash-link">Copy</button></div>
  <label class="label-sm" for="readable-link">Readable Link</label>
  <div class="row"><input id="readable-link" readonly><button data-copy="readable-link">Copy</button></div>
</section>
</main>"#,
        link_base = escape_html(link_base),
    );
    layout(APP_NAME, View::Home, &main, COMPOSER_SCRIPT)
}

/// `messages` arrive newest first; pinned cards are moved to the front here.
pub fn render_listing(messages: &[Message]) -> String {
    let cards: String = if messages.is_empty() {
        r#"<p class="empty">No messages yet.</p>"#.to_string()
    } else {
        pinned_first(messages.iter().enumerate(), |(_, m): &(usize, &Message)| m.is_pinned)
            .into_iter()
            .map(|(order, message)| render_card(order, message))
            .collect()
    };

    let main = format!(
        r#"<main>
<div class="row spread"><h2>All Messages</h2><button id="clear-all" class="danger">Clear All</button></div>
<div id="message-list" class="list">{cards}</div>
<dialog id="confirm-clear">
  <h3>Are you sure?</h3>
  <p>This will permanently delete all messages. This action cannot be undone.</p>
  <div class="row end"><button id="cancel-clear">Cancel</button><button id="confirm-clear-btn" class="danger">Delete All</button></div>
</dialog>
</main>"#
    );
    layout(APP_NAME, View::Messages, &main, LISTING_SCRIPT)
}

/// `order` is the card's position in the newest-first listing; the page
/// script re-partitions by it so each group keeps that order.
fn render_card(order: usize, message: &Message) -> String {
    let id = escape_html(&message.id);
    format!(
        r#"<article class="card" data-id="{id}" data-order="{order}" data-pinned="{pinned}">
  <div class="grow"><div class="preview">{content}</div><div class="meta">Shared on {shared}</div></div>
  <div class="actions">
    <a class="button" href="/message/{id}">View</a>
    <button data-action="pin" class="{pin_class}" title="Pin">&#128204;</button>
    <button data-action="delete" class="danger" title="Delete">&#128465;</button>
  </div>
</article>"#,
        pinned = message.is_pinned,
        content = escape_html(&message.content),
        shared = escape_html(&format_shared_on(&message.timestamp)),
        pin_class = if message.is_pinned { "pin pinned" } else { "pin" },
    )
}

/// Detail view shared by the id link and the readable link.
pub fn render_detail(message: &Message, link_base: &str) -> String {
    let main = format!(
        r#"<main class="narrow">
<a class="button ghost" href="/messages">&larr; Back to Messages</a>
<section class="card column">
  <textarea id="content" class="editor" readonly>{content}</textarea>
  <div class="row spread"><span class="meta">Shared on {shared}</span><button id="copy-content">Copy to Clipboard</button></div>
  <div class="meta">Links: <a href="{base}/message/{id}">{base}/message/{id}</a> &middot; <a href="{base}/m/{slug}">{base}/m/{slug}</a></div>
</section>
</main>"#,
        content = escape_html(&message.content),
        shared = escape_html(&format_shared_on(&message.timestamp)),
        base = escape_html(link_base),
        id = escape_html(&message.id),
        slug = escape_html(&message.readable_slug),
    );
    let title = format!("{APP_NAME} - {}", message.readable_slug);
    layout(&title, View::Messages, &main, DETAIL_SCRIPT)
}

pub fn render_not_found() -> String {
    let main = r#"<main class="narrow"><h2>Message Not Found</h2><p>The link may be mistyped, or the message was deleted.</p><a class="button" href="/messages">Back to Messages</a></main>"#;
    layout("Message Not Found", View::Messages, main, "")
}

const STYLE: &str = r#"
body{margin:0;font-family:system-ui,sans-serif;background:#f3f4f6;color:#111827}
.page{max-width:64rem;margin:0 auto;padding:2rem 1rem}
.nav{display:flex;justify-content:space-between;align-items:center;background:#fff;border-radius:.75rem;padding:1rem;margin-bottom:3rem;box-shadow:0 1px 2px #0001}
.brand{margin:0;font-size:1.8rem;color:#4f46e5}
.nav-link{margin-left:1rem;text-decoration:none;color:#374151}.nav-link.active{color:#2563eb}
.narrow{max-width:42rem;margin:0 auto;display:flex;flex-direction:column;gap:1rem}
.editor{height:10rem;font-family:monospace;border-radius:.75rem;padding:.75rem;border:1px solid #d1d5db}
.row{display:flex;gap:.5rem;align-items:center}.spread{justify-content:space-between}.end{justify-content:flex-end}
.row input{flex:1;font-family:monospace;padding:.5rem;border-radius:.75rem;border:1px solid #d1d5db}
.list{display:grid;gap:1rem;background:#fff;border:1px solid #e5e7eb;border-radius:.75rem;padding:1rem;max-height:600px;overflow:auto}
.card{display:flex;gap:1rem;justify-content:space-between;background:#fff;border:1px solid #e5e7eb;border-radius:.75rem;padding:1rem}
.card.column{flex-direction:column}.grow{flex:1;min-width:0}
.preview{font-family:monospace;font-size:.875rem;overflow:hidden;display:-webkit-box;-webkit-line-clamp:2;-webkit-box-orient:vertical;white-space:pre-wrap}
.meta{font-size:.875rem;color:#6b7280}.actions{display:flex;gap:.5rem;align-items:flex-start}
button,.button{cursor:pointer;border:1px solid #d1d5db;background:#fff;border-radius:.5rem;padding:.4rem .8rem;text-decoration:none;color:inherit;font:inherit}
.primary{background:#4f46e5;color:#fff;border:none}.wide{width:100%;padding:.75rem}
.danger{background:#dc2626;color:#fff;border:none}.ghost{border:none;background:none;align-self:flex-start}
.pin.pinned{border-color:#2563eb;background:#dbeafe}.empty{color:#6b7280}
.links{display:flex;flex-direction:column;gap:.5rem}.label{font-size:1.1rem;font-weight:500}.label-sm{font-size:.875rem;font-weight:500}
"#;

const COMPOSER_SCRIPT: &str = r#"
const composer = document.getElementById('composer');
const base = composer.dataset.linkBase || window.location.origin;
const input = document.getElementById('content');
document.getElementById('share').addEventListener('click', async () => {
  const content = input.value;
  if (!content) return;
  const res = await fetch('/api/messages', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify({ content }),
  });
  if (!res.ok) return;
  const message = await res.json();
  document.getElementById('hash-link').value = `${base}/message/${message.id}`;
  document.getElementById('readable-link').value = `${base}/m/${message.readableSlug}`;
  document.getElementById('links').hidden = false;
  input.value = '';
});
document.querySelectorAll('[data-copy]').forEach((button) => {
  button.addEventListener('click', () => {
    navigator.clipboard.writeText(document.getElementById(button.dataset.copy).value);
  });
});
"#;

// Pin and delete update the page first and send the request without
// waiting; a failed request is not rolled back.
const LISTING_SCRIPT: &str = r#"
const list = document.getElementById('message-list');
const send = (method, body) => fetch('/api/messages', {
  method,
  headers: { 'Content-Type': 'application/json' },
  body: JSON.stringify(body),
}).catch(() => {});
const reorder = () => {
  const cards = [...list.querySelectorAll('.card')]
    .sort((a, b) => Number(a.dataset.order) - Number(b.dataset.order));
  cards.filter((c) => c.dataset.pinned === 'true').forEach((c) => list.appendChild(c));
  cards.filter((c) => c.dataset.pinned !== 'true').forEach((c) => list.appendChild(c));
};
list.addEventListener('click', (event) => {
  const button = event.target.closest('[data-action]');
  if (!button) return;
  const card = button.closest('.card');
  const id = card.dataset.id;
  if (button.dataset.action === 'pin') {
    const isPinned = card.dataset.pinned !== 'true';
    card.dataset.pinned = String(isPinned);
    button.classList.toggle('pinned', isPinned);
    reorder();
    send('PATCH', { id, isPinned });
  } else if (button.dataset.action === 'delete') {
    card.remove();
    send('DELETE', { id });
  }
});
const dialog = document.getElementById('confirm-clear');
document.getElementById('clear-all').addEventListener('click', () => dialog.showModal());
document.getElementById('cancel-clear').addEventListener('click', () => dialog.close());
document.getElementById('confirm-clear-btn').addEventListener('click', async () => {
  await send('DELETE', {});
  list.innerHTML = '<p class="empty">No messages yet.</p>';
  dialog.close();
});
"#;

const DETAIL_SCRIPT: &str = r#"
document.getElementById('copy-content').addEventListener('click', () => {
  navigator.clipboard.writeText(document.getElementById('content').value);
});
"#;
