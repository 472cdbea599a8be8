//! Reference data compiled into the binary.

/// Asset files keyed by their path relative to the asset root.
pub(super) const FILES: &[(&str, &str)] = &[
    ("tags/aerialway.json", include_str!("../../assets/tags/aerialway.json")),
    ("tags/aeroway.json", include_str!("../../assets/tags/aeroway.json")),
    ("tags/amenity.json", include_str!("../../assets/tags/amenity.json")),
    ("tags/artwork_type.json", include_str!("../../assets/tags/artwork_type.json")),
    ("tags/attraction.json", include_str!("../../assets/tags/attraction.json")),
    ("tags/building.json", include_str!("../../assets/tags/building.json")),
    ("tags/business.json", include_str!("../../assets/tags/business.json")),
    ("tags/club.json", include_str!("../../assets/tags/club.json")),
    ("tags/craft.json", include_str!("../../assets/tags/craft.json")),
    ("tags/emergency.json", include_str!("../../assets/tags/emergency.json")),
    ("tags/hazard.json", include_str!("../../assets/tags/hazard.json")),
    ("tags/healthcare.json", include_str!("../../assets/tags/healthcare.json")),
    ("tags/historic.json", include_str!("../../assets/tags/historic.json")),
    ("tags/leisure.json", include_str!("../../assets/tags/leisure.json")),
    ("tags/natural.json", include_str!("../../assets/tags/natural.json")),
    ("tags/office.json", include_str!("../../assets/tags/office.json")),
    ("tags/public_transport.json", include_str!("../../assets/tags/public_transport.json")),
    ("tags/shop.json", include_str!("../../assets/tags/shop.json")),
    ("tags/sport.json", include_str!("../../assets/tags/sport.json")),
    ("tags/theatre_genre.json", include_str!("../../assets/tags/theatre_genre.json")),
    ("tags/tourism.json", include_str!("../../assets/tags/tourism.json")),
    ("taginfo/clothes.json", include_str!("../../assets/taginfo/clothes.json")),
    ("taginfo/cuisine.json", include_str!("../../assets/taginfo/cuisine.json")),
    ("taginfo/denomination.json", include_str!("../../assets/taginfo/denomination.json")),
    ("taginfo/payment.json", include_str!("../../assets/taginfo/payment.json")),
    ("taginfo/rental.json", include_str!("../../assets/taginfo/rental.json")),
    ("enrich/assoc.json", include_str!("../../assets/enrich/assoc.json")),
];

/// Contents of a bundled asset.
pub(super) fn file(name: &str) -> Option<&'static str> {
    FILES
        .iter()
        .find(|(path, _)| *path == name)
        .map(|(_, contents)| *contents)
}
