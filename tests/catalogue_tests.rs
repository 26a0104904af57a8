// tests/catalogue_tests.rs
//
// SQLite-backed catalogue: upserts, partial updates, level validation and
// moving an equipped weapon between characters.

use pick_ban_backend::dto::character_dto::{Character, UpdateCharacter};
use pick_ban_backend::dto::weapon_dto::{UpdateWeapon, Weapon};
use pick_ban_backend::services::catalogue::{CatalogueError, CatalogueLookup, SqliteCatalogue};
use pick_ban_backend::services::schema::{connect, create_schema};

async fn catalogue() -> SqliteCatalogue {
    let pool = connect("sqlite::memory:", 1).await.unwrap();
    create_schema(&pool).await.unwrap();
    let catalogue = SqliteCatalogue::new(pool);

    catalogue
        .upsert_weapon(&Weapon {
            id: "homa".into(),
            name: "Staff of Homa".into(),
            rarity: 5,
            weapon_type: "Polearm".into(),
            owned: true,
            level: 90,
            refinement_level: 1,
        })
        .await
        .unwrap();
    catalogue
        .upsert_weapon(&Weapon {
            id: "wolf".into(),
            name: "Wolf's Gravestone".into(),
            rarity: 5,
            weapon_type: "Claymore".into(),
            owned: false,
            level: 1,
            refinement_level: 1,
        })
        .await
        .unwrap();

    for (id, name) in [("hutao", "Hu Tao"), ("xiao", "Xiao")] {
        catalogue
            .upsert_character(&Character {
                id: id.into(),
                name: name.into(),
                rarity: 5,
                element: "Pyro".into(),
                weapon_type: "Polearm".into(),
                owned: true,
                level: 80,
                constellation_level: 0,
                equipped_weapon_id: None,
            })
            .await
            .unwrap();
    }

    catalogue
}

#[tokio::test]
async fn partial_update_changes_only_given_fields() {
    let catalogue = catalogue().await;
    let update = UpdateCharacter { constellation_level: Some(2), ..UpdateCharacter::default() };
    let updated = catalogue.update_character("hutao", &update).await.unwrap();

    assert_eq!(updated.constellation_level, 2);
    assert_eq!(updated.level, 80);
    assert_eq!(catalogue.get_character_by_id("hutao").await.unwrap(), updated);
}

#[tokio::test]
async fn equipping_a_held_weapon_moves_it() {
    let catalogue = catalogue().await;
    let equip = UpdateCharacter {
        equipped_weapon_id: Some(Some("homa".into())),
        ..UpdateCharacter::default()
    };
    catalogue.update_character("hutao", &equip).await.unwrap();
    catalogue.update_character("xiao", &equip).await.unwrap();

    let snapshot = catalogue.snapshot().await.unwrap();
    assert_eq!(snapshot.character("hutao").unwrap().equipped_weapon_id, None);
    assert_eq!(snapshot.character("xiao").unwrap().equipped_weapon_id.as_deref(), Some("homa"));

    let unequip = UpdateCharacter { equipped_weapon_id: Some(None), ..UpdateCharacter::default() };
    let xiao = catalogue.update_character("xiao", &unequip).await.unwrap();
    assert_eq!(xiao.equipped_weapon_id, None);
}

#[tokio::test]
async fn wrong_weapon_type_is_rejected() {
    let catalogue = catalogue().await;
    let equip = UpdateCharacter {
        equipped_weapon_id: Some(Some("wolf".into())),
        ..UpdateCharacter::default()
    };
    let err = catalogue.update_character("hutao", &equip).await.unwrap_err();
    assert!(matches!(err, CatalogueError::Validation(_)));
}

#[tokio::test]
async fn out_of_range_levels_are_rejected() {
    let catalogue = catalogue().await;

    let too_many = UpdateCharacter { constellation_level: Some(7), ..UpdateCharacter::default() };
    assert!(matches!(
        catalogue.update_character("hutao", &too_many).await,
        Err(CatalogueError::Validation(_))
    ));

    let no_refinement = UpdateWeapon { refinement_level: Some(0), ..UpdateWeapon::default() };
    assert!(matches!(
        catalogue.update_weapon("homa", &no_refinement).await,
        Err(CatalogueError::Validation(_))
    ));

    let max = UpdateWeapon { refinement_level: Some(5), ..UpdateWeapon::default() };
    assert_eq!(catalogue.update_weapon("homa", &max).await.unwrap().refinement_level, 5);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let catalogue = catalogue().await;
    assert!(matches!(
        catalogue.get_character_by_id("nobody").await,
        Err(CatalogueError::NotFound { kind: "Character", .. })
    ));
    assert!(matches!(
        catalogue.get_weapon_by_id("stick").await,
        Err(CatalogueError::NotFound { kind: "Weapon", .. })
    ));
}

#[test]
fn update_payload_distinguishes_unequip_from_absent() {
    let absent: UpdateCharacter = serde_json::from_str(r#"{"level": 90}"#).unwrap();
    assert_eq!(absent.equipped_weapon_id, None);

    let unequip: UpdateCharacter = serde_json::from_str(r#"{"equipped_weapon_id": null}"#).unwrap();
    assert_eq!(unequip.equipped_weapon_id, Some(None));
}

#[tokio::test]
async fn upsert_with_wrong_weapon_type_keeps_current_holder() {
    let catalogue = catalogue().await;
    let equip = UpdateCharacter {
        equipped_weapon_id: Some(Some("homa".into())),
        ..UpdateCharacter::default()
    };
    catalogue.update_character("xiao", &equip).await.unwrap();

    let swordsman = Character {
        id: "ayaka".into(),
        name: "Kamisato Ayaka".into(),
        rarity: 5,
        element: "Cryo".into(),
        weapon_type: "Sword".into(),
        owned: true,
        level: 90,
        constellation_level: 0,
        equipped_weapon_id: Some("homa".into()),
    };
    let err = catalogue.upsert_character(&swordsman).await.unwrap_err();
    assert!(matches!(err, CatalogueError::Validation(_)));

    let snapshot = catalogue.snapshot().await.unwrap();
    assert!(snapshot.character("ayaka").is_none());
    assert_eq!(snapshot.character("xiao").unwrap().equipped_weapon_id.as_deref(), Some("homa"));
}
