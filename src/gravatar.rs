use {
    sha2::{
        Digest as _,
        Sha256,
    },
    crate::prelude::*,
};

/// Avatar URL for an e-mail address, falling back to the generic silhouette (`d=mp`).
pub(crate) fn url(email: &str, size: u16) -> String {
    let hash = Sha256::digest(email.trim().to_lowercase().as_bytes());
    format!("https://www.gravatar.com/avatar/{hash:x}?s={size}&d=mp&r=g")
}

pub(crate) fn image(email: &str, alt: &str, size: u16) -> RawHtml<String> {
    html! {
        img(class = "gravatar", alt = alt, width = size.to_string(), height = size.to_string(), src = url(email, size));
    }
}
