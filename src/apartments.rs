use crate::errors::AlertError;
use crate::models::{Apartment, LatLon, NewApartment};
use chrono::Utc;

/// The tracked rental listings, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApartmentBook {
    apartments: Vec<Apartment>,
}

impl ApartmentBook {
    pub fn new(apartments: Vec<Apartment>) -> Self {
        Self { apartments }
    }

    pub fn list(&self) -> &[Apartment] {
        &self.apartments
    }

    /// Listings whose address or details contain `term`, ignoring case.
    /// A blank term matches everything.
    pub fn search(&self, term: &str) -> Vec<&Apartment> {
        let term = term.trim().to_lowercase();
        self.apartments
            .iter()
            .filter(|apartment| {
                term.is_empty()
                    || apartment.address.to_lowercase().contains(&term)
                    || apartment.details.to_lowercase().contains(&term)
            })
            .collect()
    }

    /// Adds a geocoded listing under a fresh millisecond-timestamp id.
    pub fn add(&mut self, form: NewApartment, position: LatLon) -> Result<&Apartment, AlertError> {
        let address = form.address.trim().to_string();
        if address.is_empty() {
            return Err(AlertError::Validation("address is required".to_string()));
        }

        let id = self.next_id(Utc::now().timestamp_millis());
        self.apartments.push(Apartment {
            id,
            address,
            contact_name: form.contact_name,
            contact_phone: form.contact_phone,
            price: form.price,
            rooms: form.rooms,
            size: form.size,
            floor: form.floor,
            details: form.details,
            lat: position.lat,
            lng: position.lon,
            notes: Vec::new(),
            is_irrelevant: false,
        });
        Ok(&self.apartments[self.apartments.len() - 1])
    }

    fn next_id(&self, mut millis: i64) -> String {
        loop {
            let id = millis.to_string();
            if !self.apartments.iter().any(|apartment| apartment.id == id) {
                return id;
            }
            millis += 1;
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.apartments.len();
        self.apartments.retain(|apartment| apartment.id != id);
        self.apartments.len() != before
    }

    pub fn add_note(&mut self, id: &str, note: &str) -> Result<&Apartment, AlertError> {
        let note = note.trim();
        if note.is_empty() {
            return Err(AlertError::Validation("note must not be empty".to_string()));
        }
        let apartment = self.find_mut(id)?;
        apartment.notes.push(note.to_string());
        Ok(apartment)
    }

    pub fn toggle_relevance(&mut self, id: &str) -> Result<&Apartment, AlertError> {
        let apartment = self.find_mut(id)?;
        apartment.is_irrelevant = !apartment.is_irrelevant;
        Ok(apartment)
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Apartment, AlertError> {
        self.apartments
            .iter_mut()
            .find(|apartment| apartment.id == id)
            .ok_or_else(|| AlertError::NotFound(format!("apartment {id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(address: &str) -> NewApartment {
        NewApartment {
            address: address.to_string(),
            contact_name: "Dana".to_string(),
            contact_phone: "972500000000".to_string(),
            price: 6200.0,
            rooms: 3.5,
            size: 85.0,
            floor: 2,
            details: "balcony".to_string(),
        }
    }

    fn position() -> LatLon {
        LatLon::new(32.0853, 34.7818)
    }

    #[test]
    fn add_assigns_unique_ids_and_position() {
        let mut book = ApartmentBook::default();
        let first = book.add(form("Dizengoff 100"), position()).unwrap().id.clone();
        let second = book.add(form("Dizengoff 102"), position()).unwrap().id.clone();
        assert_ne!(first, second);
        assert_eq!(book.list().len(), 2);
        assert_eq!(book.list()[0].lat, 32.0853);
        assert_eq!(book.list()[0].lng, 34.7818);
        assert!(!book.list()[0].is_irrelevant);
    }

    #[test]
    fn next_id_skips_taken_ids() {
        let mut book = ApartmentBook::default();
        book.add(form("A"), position()).unwrap();
        let taken: i64 = book.list()[0].id.parse().unwrap();
        assert_eq!(book.next_id(taken), (taken + 1).to_string());
    }

    #[test]
    fn add_requires_address() {
        let mut book = ApartmentBook::default();
        assert!(matches!(
            book.add(form("   "), position()),
            Err(AlertError::Validation(_))
        ));
    }

    #[test]
    fn remove_reports_whether_anything_went() {
        let mut book = ApartmentBook::default();
        let id = book.add(form("A"), position()).unwrap().id.clone();
        assert!(!book.remove("missing"));
        assert!(book.remove(&id));
        assert!(book.list().is_empty());
    }

    #[test]
    fn notes_append_in_order() {
        let mut book = ApartmentBook::default();
        let id = book.add(form("A"), position()).unwrap().id.clone();
        book.add_note(&id, "called, no answer").unwrap();
        let apartment = book.add_note(&id, " visit on Sunday ").unwrap();
        assert_eq!(apartment.notes, vec!["called, no answer", "visit on Sunday"]);
        assert!(matches!(book.add_note(&id, " "), Err(AlertError::Validation(_))));
        assert!(matches!(book.add_note("nope", "x"), Err(AlertError::NotFound(_))));
    }

    #[test]
    fn relevance_toggles_back_and_forth() {
        let mut book = ApartmentBook::default();
        let id = book.add(form("A"), position()).unwrap().id.clone();
        assert!(book.toggle_relevance(&id).unwrap().is_irrelevant);
        assert!(!book.toggle_relevance(&id).unwrap().is_irrelevant);
        assert!(matches!(book.toggle_relevance("nope"), Err(AlertError::NotFound(_))));
    }

    #[test]
    fn search_matches_address_or_details_ignoring_case() {
        let mut book = ApartmentBook::default();
        book.add(form("Dizengoff 100"), position()).unwrap();
        let mut quiet = form("Herzl 5");
        quiet.details = "Quiet street, parking".to_string();
        book.add(quiet, position()).unwrap();

        let by_address: Vec<_> = book.search("DIZENGOFF").iter().map(|a| a.address.as_str()).collect();
        assert_eq!(by_address, vec!["Dizengoff 100"]);
        let by_details: Vec<_> = book.search("parking").iter().map(|a| a.address.as_str()).collect();
        assert_eq!(by_details, vec!["Herzl 5"]);
        assert_eq!(book.search("").len(), 2);
        assert_eq!(book.search("   ").len(), 2);
        assert!(book.search("penthouse").is_empty());
    }
}
