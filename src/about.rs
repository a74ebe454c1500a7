//! "About Us" cards: round portraits inlined as base64 PNG data URIs.

use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{imageops::FilterType, DynamicImage, ImageOutputFormat, RgbaImage};
use std::{io::Cursor, path::Path};

use crate::pages::escape;

pub const GUIDE_PORTRAIT_PX: u32 = 150;
pub const TEAM_PORTRAIT_PX: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Mail,
    Web,
    LinkedIn,
    GitHub,
}

impl LinkKind {
    fn icon(self) -> &'static str {
        match self {
            LinkKind::Mail => "fa-envelope",
            LinkKind::Web => "fa-globe",
            LinkKind::LinkedIn => "fa-linkedin",
            LinkKind::GitHub => "fa-github",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Member {
    pub name: &'static str,
    /// File name under the assets directory.
    pub portrait: &'static str,
    pub links: &'static [(LinkKind, &'static str)],
}

pub const GUIDE: Member = Member {
    name: "Dr Lalu Seban",
    portrait: "prof.png",
    links: &[
        (LinkKind::Mail, "mailto:lalu@ei.nits.ac.in"),
        (LinkKind::Web, "http://eie.nits.ac.in/lalu/"),
    ],
};

pub const TEAM: [Member; 3] = [
    Member {
        name: "Hritik Baranwal",
        portrait: "team1.png",
        links: &[
            (LinkKind::Mail, "mailto:baranwalhritik@gmail.com"),
            (LinkKind::LinkedIn, "https://www.linkedin.com/in/hritik-baranwal-b65729237/"),
            (LinkKind::GitHub, "https://github.com/hritik06"),
        ],
    },
    Member {
        name: "Vijay Kumar Kasaudhan",
        portrait: "team2.png",
        links: &[
            (LinkKind::Mail, "mailto:kaushikborah4080@gmail.com"),
            (LinkKind::LinkedIn, "https://www.linkedin.com/in/kaushik-borah-317758226/"),
            (LinkKind::GitHub, "https://github.com/dngeonMaster1706"),
        ],
    },
    Member {
        name: "Rahul Chauhan",
        portrait: "team3.png",
        links: &[
            (LinkKind::Mail, "mailto:hritik21_ug@ei.nits.ac.in"),
            (LinkKind::LinkedIn, "https://www.linkedin.com/in/hritik-baranwal-b65729237/"),
            (LinkKind::GitHub, "https://github.com/hritik06"),
        ],
    },
];

/// Square Lanczos resize followed by a circular alpha mask.
pub fn make_image_round(path: &Path, size: u32) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("failed to open portrait {}", path.display()))?
        .to_rgba8();
    let mut round = image::imageops::resize(&img, size, size, FilterType::Lanczos3);

    let r = size as f64 / 2.0;
    for (x, y, px) in round.enumerate_pixels_mut() {
        let dx = x as f64 + 0.5 - r;
        let dy = y as f64 + 0.5 - r;
        if dx * dx + dy * dy > r * r {
            px.0 = [0, 0, 0, 0];
        }
    }
    Ok(round)
}

pub fn image_base64(img: &RgbaImage) -> Result<String> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .context("failed to encode portrait as PNG")?;
    Ok(STANDARD.encode(buf))
}

fn portrait_data_uri(assets_dir: &Path, member: &Member, size: u32) -> Option<String> {
    let path = assets_dir.join(member.portrait);
    match make_image_round(&path, size).and_then(|img| image_base64(&img)) {
        Ok(b64) => Some(format!("data:image/png;base64,{b64}")),
        Err(e) => {
            tracing::warn!(member = member.name, error = %e, "portrait unavailable");
            None
        }
    }
}

fn card(member: &Member, img_src: Option<&str>) -> String {
    let img = img_src
        .map(|src| format!(r#"<img src="{src}" alt="{}">"#, escape(member.name)))
        .unwrap_or_default();
    let links: String = member
        .links
        .iter()
        .map(|(kind, href)| {
            format!(
                r#"<a href="{}"><i class="fa {}"></i></a>"#,
                escape(href),
                kind.icon()
            )
        })
        .collect::<Vec<_>>()
        .join("\n      ");
    format!(
        r#"<div class="card">
  {img}
  <div class="container">
    <b>{name}</b><br>
      {links}
  </div>
</div>"#,
        name = escape(member.name),
    )
}

/// Pre-rendered About page body. Built once at startup.
#[derive(Debug, Clone)]
pub struct AboutCards {
    pub guide: String,
    pub team: Vec<String>,
}

impl AboutCards {
    pub fn render(assets_dir: &Path) -> Self {
        let guide_img = portrait_data_uri(assets_dir, &GUIDE, GUIDE_PORTRAIT_PX);
        let guide = card(&GUIDE, guide_img.as_deref());
        let team = TEAM
            .iter()
            .map(|m| card(m, portrait_data_uri(assets_dir, m, TEAM_PORTRAIT_PX).as_deref()))
            .collect();
        Self { guide, team }
    }
}
