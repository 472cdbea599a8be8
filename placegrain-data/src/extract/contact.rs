//! Contact and address rules.

use placegrain_core::{Address, Attributes, SocialNetworks};

use super::{candidates, first_valid, validate};
use crate::element::Tags;
use crate::text::non_blank;

const IMAGE: &[&str] = &["image"];
const WEBSITE: &[&str] = &["contact:website", "website", "url"];
const WIKIPEDIA: &[&str] = &["wikipedia"];
const EMAIL: &[&str] = &["contact:email", "email"];
const PHONE: &[&str] = &["contact:phone", "phone", "contact:mobile"];

const COUNTRY: &[&str] = &["addr:country"];
const SETTLEMENT: &[&str] = &["addr:city", "addr:province", "addr:county", "addr:hamlet"];
const DISTRICT: &[&str] = &["addr:district", "addr:subdistrict", "addr:suburb"];
const PLACE: &[&str] = &["addr:street", "addr:place"];
const HOUSE: &[&str] = &["addr:housenumber", "addr:conscriptionnumber"];
const POSTAL_CODE: &[&str] = &["addr:postcode", "addr:postbox"];

pub(super) fn extract(tags: &Tags, attributes: &mut Attributes) {
    attributes.image = first_valid(tags, IMAGE, validate::url);
    attributes.website = first_valid(tags, WEBSITE, validate::url)
        .or_else(|| first_valid(tags, WIKIPEDIA, validate::wikipedia));
    attributes.email = first_valid(tags, EMAIL, validate::email);
    attributes.phone = first_valid(tags, PHONE, validate::phone);
    attributes.address = address(tags);
    attributes.social_networks = social_networks(tags);
}

fn first_text(tags: &Tags, keys: &'static [&'static str]) -> Option<String> {
    candidates(tags, keys)
        .find_map(non_blank)
        .map(str::to_owned)
}

fn address(tags: &Tags) -> Option<Address> {
    let address = Address {
        country: first_text(tags, COUNTRY),
        settlement: first_text(tags, SETTLEMENT),
        district: first_text(tags, DISTRICT),
        place: first_text(tags, PLACE),
        house: first_text(tags, HOUSE),
        postal_code: first_text(tags, POSTAL_CODE),
    };
    (!address.is_empty()).then_some(address)
}

fn social_networks(tags: &Tags) -> Option<SocialNetworks> {
    let network = |keys: &'static [&'static str]| first_valid(tags, keys, validate::url);
    let networks = SocialNetworks {
        facebook: network(&["contact:facebook", "facebook"]),
        instagram: network(&["contact:instagram", "instagram"]),
        linkedin: network(&["contact:linkedin", "linkedin"]),
        pinterest: network(&["contact:pinterest", "pinterest"]),
        telegram: network(&["contact:telegram", "telegram"]),
        twitter: network(&["contact:twitter", "twitter"]),
        youtube: network(&["contact:youtube", "youtube"]),
    };
    (!networks.is_empty()).then_some(networks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::tags;
    use rstest::rstest;

    fn run(pairs: &[(&str, &str)]) -> Attributes {
        let mut attributes = Attributes::default();
        extract(&tags(pairs.iter().copied()), &mut attributes);
        attributes
    }

    #[rstest]
    fn website_prefers_contact_key() {
        let attributes = run(&[
            ("website", "https://plain.example/"),
            ("contact:website", "https://contact.example/"),
        ]);
        assert_eq!(attributes.website.as_deref(), Some("https://contact.example/"));
    }

    #[rstest]
    fn website_skips_invalid_candidates() {
        let attributes = run(&[("contact:website", "ftp://x.example"), ("url", "ok.example")]);
        assert_eq!(attributes.website.as_deref(), Some("https://ok.example/"));
    }

    #[rstest]
    fn website_falls_back_to_wikipedia() {
        let attributes = run(&[("wikipedia", "en:Charles Bridge")]);
        assert_eq!(
            attributes.website.as_deref(),
            Some("https://en.wikipedia.org/wiki/Charles_Bridge")
        );
    }

    #[rstest]
    fn phone_uses_mobile_last() {
        let attributes = run(&[("contact:mobile", "+420 777 000 111"), ("phone", "abc")]);
        assert_eq!(attributes.phone.as_deref(), Some("+420 777 000 111"));
    }

    #[rstest]
    fn address_groups_take_first_present_key() {
        let attributes = run(&[
            ("addr:city", "Praha"),
            ("addr:hamlet", "Ignored"),
            ("addr:suburb", "Malá Strana"),
            ("addr:street", "Karmelitská"),
            ("addr:conscriptionnumber", "385"),
            ("addr:postcode", "118 00"),
        ]);
        assert_eq!(
            attributes.address,
            Some(Address {
                country: None,
                settlement: Some("Praha".to_owned()),
                district: Some("Malá Strana".to_owned()),
                place: Some("Karmelitská".to_owned()),
                house: Some("385".to_owned()),
                postal_code: Some("118 00".to_owned()),
            })
        );
    }

    #[rstest]
    fn blank_address_is_omitted() {
        assert!(run(&[("addr:city", "  ")]).address.is_none());
    }

    #[rstest]
    fn social_networks_require_urls() {
        let attributes = run(&[
            ("contact:facebook", "https://facebook.com/museum"),
            ("twitter", "https://"),
        ]);
        let networks = attributes.social_networks.expect("networks present");
        assert_eq!(networks.facebook.as_deref(), Some("https://facebook.com/museum"));
        assert!(networks.twitter.is_none());
    }
}
