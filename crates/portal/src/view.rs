//! Rendering of the portal view.
//!
//! HTML fragments for the browser page, rendered with `handlebars`, and a table for terminals.
//! Templates only use the escaping `{{...}}` form, so text from the user or the contract never
//! reaches the page unescaped.

use crate::{
    Result,
    session::Snapshot,
    wave::{Wave, WaveList},
};
use alloy_primitives::Address;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use handlebars::Handlebars;
use serde::Serialize;
use serde_json::json;

/// Styles for the page, all scoped under the `.wave-portal` root element.
pub const STYLESHEET: &str = r#"
.wave-portal {
  background: black;
  color: white;
  min-height: 100vh;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
}
.wave-portal nav {
  display: flex;
  justify-content: space-between;
  align-items: center;
  padding: 16px 32px;
}
.wave-portal .header {
  font-size: 32px;
  font-weight: 600;
}
.wave-portal .dataContainer {
  display: flex;
  flex-direction: column;
  max-width: 600px;
  margin: 32px auto;
}
.wave-portal .bio {
  text-align: center;
  color: gray;
  margin-bottom: 16px;
}
.wave-portal textarea {
  min-height: 80px;
  padding: 8px;
  border-radius: 5px;
  margin-bottom: 8px;
}
.wave-portal button {
  cursor: pointer;
  padding: 8px;
  border: 0;
  border-radius: 5px;
}
.wave-portal .clickButton,
.wave-portal .waveButton {
  background-color: #01fff4;
}
.wave-portal .connectedButton {
  background-color: #3cb371;
  color: white;
}
.wave-portal .wave {
  background-color: transparent;
  font-size: 14px;
  border: 1px solid #01fff4;
  color: white;
  border-radius: 5px;
  margin-top: 16px;
  padding: 8px;
}
"#;

const HEADER: &str = concat!(
    r#"<div class="header">"#,
    r#"<span role="img" aria-label="heart">💗</span>O"#,
    r#"<span role="img" aria-label="unicorn">🦄</span>M"#,
    r#"<span role="img" aria-label="white-flower">🌼</span>A"#,
    r#"<span role="img" aria-label="pink-flower">🌸</span>"#,
    "</div>"
);

/// Introduction shown above the composer.
pub const BIO: &str = concat!(
    r#"<h1>Hi Friend<span role="img" aria-label="flower">🌺</span></h1>"#,
    "I am OMA, a frontend developer, technical writer and Web3 enthusiast. ",
    "Connect your Ethereum wallet and wave at me!"
);

const CONNECT_BUTTON: &str = concat!(
    r#"{{#if account}}"#,
    r#"<button id="connect" class="connectedButton" title="{{account}}">Wallet Connected!</button>"#,
    r#"{{else}}"#,
    r#"<button id="connect" class="clickButton">"#,
    r#"<span role="img" aria-label="point-left">👉🏽</span>Connect Wallet"#,
    r#"<span role="img" aria-label="point-right">👈🏽</span></button>"#,
    r#"{{/if}}"#
);

const COMPOSER: &str = concat!(
    r#"{{#if connected}}"#,
    r#"<textarea name="tweetArea" id="tweet" placeholder="type your tweet">{{draft}}</textarea>"#,
    r#"{{/if}}"#,
    r#"<button id="wave" class="waveButton">"#,
    r#"<span role="img" aria-label="wave">👋🏽</span>Wave at Me</button>"#
);

const WAVES: &str = concat!(
    r#"{{#each waves}}<div class="wave">"#,
    r#"<div>Address: {{address}}</div><div>Time: {{time}}</div><div>Message: {{message}}</div>"#,
    r#"</div>{{/each}}"#
);

fn render(template: &str, data: &impl Serialize) -> Result<String> {
    Ok(Handlebars::new().render_template(template, data)?)
}

pub fn render_header() -> String {
    HEADER.to_string()
}

/// The navigation bar: header plus the connect button, which changes label once an account is
/// connected.
pub fn render_nav(account: Option<Address>) -> Result<String> {
    let button = render(CONNECT_BUTTON, &json!({ "account": account.map(|a| a.to_string()) }))?;
    Ok(format!("{HEADER}{button}"))
}

/// The message box, shown only with an active account, followed by the submit button.
pub fn render_composer(snapshot: &Snapshot) -> Result<String> {
    render(COMPOSER, &json!({ "connected": snapshot.account.is_some(), "draft": snapshot.draft }))
}

fn wave_data(wave: &Wave) -> serde_json::Value {
    json!({
        "address": wave.address.to_string(),
        "time": wave.timestamp.to_rfc2822(),
        "message": wave.message,
    })
}

/// One card per wave, in list order.
pub fn render_waves(waves: &WaveList) -> Result<String> {
    let waves: Vec<_> = waves.iter().map(wave_data).collect();
    render(WAVES, &json!({ "waves": waves }))
}

/// Terminal rendering of the wave list.
pub fn waves_table(waves: &WaveList) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(["Address", "Time", "Message"]);
    for wave in waves {
        table.add_row([
            wave.address.to_string(),
            wave.timestamp.to_rfc2822(),
            wave.message.clone(),
        ]);
    }
    table
}
