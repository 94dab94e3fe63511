use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotoRef {
    pub id: u64,
    pub year: i32,
    pub brand: String,
    pub model: String,
}

/// Distinct years, newest first.
pub fn years(motos: &[MotoRef]) -> Vec<i32> {
    let mut years: Vec<i32> = motos.iter().map(|m| m.year).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

/// Distinct brands, narrowed to `year` when one is selected.
pub fn brands(motos: &[MotoRef], year: Option<i32>) -> Vec<String> {
    let mut brands: Vec<String> = motos
        .iter()
        .filter(|m| year.map_or(true, |y| m.year == y))
        .map(|m| m.brand.clone())
        .collect();
    brands.sort();
    brands.dedup();
    brands
}

/// Models matching `brand` and, if set, `year`. Empty until a brand is chosen.
pub fn models<'a>(motos: &'a [MotoRef], brand: Option<&str>, year: Option<i32>) -> Vec<&'a MotoRef> {
    let brand = match brand {
        Some(brand) => brand,
        None => return Vec::new(),
    };
    motos
        .iter()
        .filter(|m| m.brand == brand)
        .filter(|m| year.map_or(true, |y| m.year == y))
        .collect()
}

#[cfg(test)]
pub(crate) fn sample_catalog() -> Vec<MotoRef> {
    let moto = |id, year, brand: &str, model: &str| MotoRef {
        id,
        year,
        brand: brand.to_string(),
        model: model.to_string(),
    };
    vec![
        moto(1, 2022, "Honda", "CB190R"),
        moto(2, 2022, "Honda", "XR150L"),
        moto(3, 2021, "Honda", "Wave 110"),
        moto(4, 2022, "Yamaha", "FZ25"),
        moto(5, 2020, "Bajaj", "Pulsar NS200"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_filter_by_brand_and_year() {
        let catalog = sample_catalog();
        let ids: Vec<u64> = models(&catalog, Some("Honda"), Some(2022))
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn models_without_year_list_every_year_of_brand() {
        let catalog = sample_catalog();
        assert_eq!(models(&catalog, Some("Honda"), None).len(), 3);
        assert!(models(&catalog, None, Some(2022)).is_empty());
    }

    #[test]
    fn years_are_distinct_and_descending() {
        assert_eq!(years(&sample_catalog()), vec![2022, 2021, 2020]);
    }

    #[test]
    fn brands_follow_selected_year() {
        let catalog = sample_catalog();
        assert_eq!(brands(&catalog, Some(2022)), vec!["Honda", "Yamaha"]);
        assert_eq!(brands(&catalog, None).len(), 3);
    }
}
