use claims::{assert_none, assert_ok, assert_some};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::proptest_arb::arb_new_album;

use crate::{
    core::storage::StorageArea,
    model::{repository::seed, AlbumId, AlbumUpdate, AssetId, CatalogEvent, NewAlbum},
};

use super::*;

fn ids(raw: &[i64]) -> Vec<AssetId> {
    raw.iter().copied().map(AssetId).collect()
}

#[test]
fn listing_falls_back_to_default_albums() {
    let stores = create_stores();
    let albums = assert_ok!(stores.albums.get_all_albums());
    assert_eq!(albums, seed::default_albums());
    assert_eq!(
        albums.iter().map(|a| a.count()).collect::<Vec<_>>(),
        vec![2, 1, 2]
    );
    // the fallback is not written
    assert_none!(assert_ok!(stores.storage.get_item("kavian_albums")));
}

#[test]
fn empty_album_collection_does_not_fall_back() {
    let stores = create_stores();
    assert_ok!(stores.albums.replace_all(&[]));
    assert!(assert_ok!(stores.albums.get_all_albums()).is_empty());
}

#[test]
fn create_keeps_defaults_and_derives_count() {
    let mut stores = create_stores();
    let album = assert_ok!(stores.albums.create_album(NewAlbum {
        title: Some("Tailings dam".to_owned()),
        image_ids: ids(&[1, 2]),
        ..Default::default()
    }));
    assert_eq!(album.count(), 2);
    let albums = assert_ok!(stores.albums.get_all_albums());
    assert_eq!(albums.len(), 4);
    assert_eq!(assert_some!(assert_ok!(stores.albums.get_album_by_id(album.id))), album);
    assert_eq!(
        drain_events(&mut stores.events),
        vec![CatalogEvent::AlbumsUpdated]
    );

    let raw = assert_some!(assert_ok!(stores.storage.get_item("kavian_albums")));
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let stored = &json[3];
    assert_eq!(stored["count"], 2);
    assert_eq!(stored["imageIds"], serde_json::json!([1, 2]));
    assert_eq!(stored["title"], "Tailings dam");
    assert!(stored.get("titleFa").is_none());
}

#[test]
fn create_twice_in_same_millisecond_gets_distinct_ids() {
    let stores = create_stores();
    let first = assert_ok!(stores.albums.create_album(NewAlbum::default()));
    let second = assert_ok!(stores.albums.create_album(NewAlbum::default()));
    assert_ne!(first.id, second.id);
}

#[test]
fn stored_count_is_ignored_on_read() {
    let stores = create_stores();
    assert_ok!(stores.storage.set_item(
        "kavian_albums",
        r#"[{"id": 7, "title": "Stale", "imageIds": [1, 2, 3], "count": 1}]"#,
        crate::model::ContextId::next(),
    ));
    let album = assert_some!(assert_ok!(stores.albums.get_album_by_id(AlbumId(7))));
    assert_eq!(album.count(), 3);
}

#[test]
fn update_merges_fields_and_ignores_missing_album() {
    let mut stores = create_stores();
    let updated = assert_ok!(stores.albums.update_album(
        AlbumId(2),
        AlbumUpdate {
            location: Some("Nevada".to_owned()),
            ..Default::default()
        }
    ));
    assert!(updated);
    let album = assert_some!(assert_ok!(stores.albums.get_album_by_id(AlbumId(2))));
    assert_eq!(album.location.as_deref(), Some("Nevada"));
    assert_eq!(album.title.as_deref(), Some("Gold Heap Leaching Project"));
    assert_eq!(drain_events(&mut stores.events).len(), 1);

    assert!(!assert_ok!(stores
        .albums
        .update_album(AlbumId(42), AlbumUpdate::default())));
    assert!(drain_events(&mut stores.events).is_empty());
}

#[test]
fn add_images_deduplicates_and_keeps_order() {
    let stores = create_stores();
    assert!(assert_ok!(stores
        .albums
        .add_images_to_album(AlbumId(1), &ids(&[4, 6, 1, 6, 2]))));
    let album = assert_some!(assert_ok!(stores.albums.get_album_by_id(AlbumId(1))));
    assert_eq!(album.image_ids, ids(&[1, 4, 6, 2]));
    assert_eq!(album.count(), 4);
    assert!(!assert_ok!(stores
        .albums
        .add_images_to_album(AlbumId(99), &ids(&[1]))));
}

#[test]
fn prop_add_images_is_idempotent() {
    proptest!(|(new_album in arb_new_album(),
        added in prop::collection::vec((1..30_i64).prop_map(AssetId), 0..10))| {
        let stores = create_stores();
        let album = stores.albums.create_album(new_album).unwrap();
        prop_assert!(stores.albums.add_images_to_album(album.id, &added).unwrap());
        let once = stores.albums.get_album_by_id(album.id).unwrap().unwrap();
        prop_assert!(stores.albums.add_images_to_album(album.id, &added).unwrap());
        let twice = stores.albums.get_album_by_id(album.id).unwrap().unwrap();
        prop_assert_eq!(&once.image_ids, &twice.image_ids);
        prop_assert_eq!(once.count(), twice.count());
        for id in &added {
            prop_assert!(twice.image_ids.contains(id));
        }
    });
}

#[test]
fn album_images_skip_dangling_ids() {
    let stores = create_stores();
    assert_ok!(stores.assets.init());
    let images = assert_ok!(stores.albums.get_album_images(AlbumId(3)));
    assert_eq!(
        images.iter().map(|a| a.id).collect::<Vec<_>>(),
        ids(&[3, 5])
    );

    assert_ok!(stores.assets.delete_asset(AssetId(3)));
    let album = assert_some!(assert_ok!(stores.albums.get_album_by_id(AlbumId(3))));
    // the album still references the deleted asset
    assert_eq!(album.image_ids, ids(&[3, 5]));
    let images = assert_ok!(stores.albums.get_album_images(AlbumId(3)));
    assert_eq!(images.iter().map(|a| a.id).collect::<Vec<_>>(), ids(&[5]));

    assert!(assert_ok!(stores.albums.get_album_images(AlbumId(404))).is_empty());
}
