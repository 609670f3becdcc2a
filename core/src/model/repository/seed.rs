use chrono::NaiveDate;

use crate::model::{Album, AlbumId, Asset, AssetId};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn asset(
    id: i64,
    name: &str,
    folder: &str,
    category: &str,
    url: &str,
    size: f64,
    day: u32,
    tags: &[&str],
    description: &str,
) -> Asset {
    Asset {
        id: AssetId(id),
        name: name.to_owned(),
        folder: folder.to_owned(),
        category: category.to_owned(),
        url: url.to_owned(),
        size,
        date: date(2024, 1, day),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        description: description.to_owned(),
    }
}

/// Written on first initialization when no asset collection exists.
pub fn sample_assets() -> Vec<Asset> {
    vec![
        asset(
            1,
            "copper-plant-exterior.jpg",
            "projects/concentration",
            "concentration",
            "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=800",
            2.4,
            15,
            &["copper", "plant", "exterior"],
            "Copper concentration plant exterior view",
        ),
        asset(
            2,
            "gold-leaching-operation.jpg",
            "projects/leaching",
            "leaching",
            "https://images.unsplash.com/photo-1611273426858-450d8e3c9fce?w=800",
            3.1,
            16,
            &["gold", "leaching", "heap"],
            "Gold heap leaching operation",
        ),
        asset(
            3,
            "crusher-equipment.jpg",
            "projects/equipment",
            "equipment",
            "https://images.unsplash.com/photo-1581092918056-0c4c3acd3789?w=800",
            2.8,
            17,
            &["crusher", "equipment", "mining"],
            "Primary crusher equipment",
        ),
        asset(
            4,
            "flotation-cells.jpg",
            "projects/concentration",
            "concentration",
            "https://images.unsplash.com/photo-1581092160562-40aa08e78837?w=800",
            3.5,
            21,
            &["flotation", "cells", "concentration"],
            "Flotation cell banks",
        ),
        asset(
            5,
            "sag-mill.jpg",
            "projects/equipment",
            "equipment",
            "https://images.unsplash.com/photo-1504917595217-d4dc5ebe6122?w=800",
            2.9,
            22,
            &["sag", "mill", "grinding"],
            "SAG mill installation",
        ),
        asset(
            6,
            "company-logo.svg",
            "logos",
            "branding",
            "https://cdn.grapesjs.com/workspaces/cmgvbwak408ja13nsemkia83b/assets/7e057c43-5d96-4c3a-a8fc-8bd5f6589a93__kavianpremiumbadgelogo.svg",
            0.5,
            20,
            &["logo", "branding"],
            "Kavian company logo",
        ),
    ]
}

/// Returned by album listing while no album collection has been written.
pub fn default_albums() -> Vec<Album> {
    let album = |id: i64,
                 category: &str,
                 title: &str,
                 title_fa: &str,
                 description: &str,
                 description_fa: &str,
                 location: &str,
                 year: &str,
                 cover: &str,
                 image_ids: &[i64]| Album {
        id: AlbumId(id),
        title: Some(title.to_owned()),
        title_fa: Some(title_fa.to_owned()),
        description: Some(description.to_owned()),
        description_fa: Some(description_fa.to_owned()),
        category: Some(category.to_owned()),
        location: Some(location.to_owned()),
        year: Some(year.to_owned()),
        cover: Some(cover.to_owned()),
        image_ids: image_ids.iter().copied().map(AssetId).collect(),
    };
    vec![
        album(
            1,
            "concentration",
            "Copper Concentration Plant - Chile",
            "کارخانه کنسانتره مس - شیلی",
            "50,000 TPD copper concentration facility",
            "تأسیسات کنسانتره مس 50000 تن در روز",
            "Chile",
            "2023",
            "https://images.unsplash.com/photo-1581094794329-c8112a89af12?w=800",
            &[1, 4],
        ),
        album(
            2,
            "leaching",
            "Gold Heap Leaching Project",
            "پروژه لیچینگ توده‌ای طلا",
            "Large-scale heap leaching operation",
            "عملیات لیچینگ توده‌ای در مقیاس بزرگ",
            "Nevada, USA",
            "2022",
            "https://images.unsplash.com/photo-1611273426858-450d8e3c9fce?w=800",
            &[2],
        ),
        album(
            3,
            "equipment",
            "Crushing & Grinding Equipment",
            "تجهیزات خردایش و آسیاب",
            "SAG mill and crusher installation",
            "نصب آسیاب SAG و خردکن",
            "Australia",
            "2023",
            "https://images.unsplash.com/photo-1581092918056-0c4c3acd3789?w=800",
            &[3, 5],
        ),
    ]
}
