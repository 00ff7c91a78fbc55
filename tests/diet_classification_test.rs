//! Integration tests for diet classification over realistic product text.

use nutriscan::diet::classifier::{DietClassifier, DietLabel};

fn classify(ingredients: &str) -> (DietLabel, f64) {
    let result = DietClassifier::new()
        .classify("", "", ingredients, false)
        .unwrap();
    (result.label, result.confidence)
}

#[test]
fn non_veg_keywords_always_win_over_plant_keywords() {
    // Tier priority: any non-veg keyword forbids a vegan label no matter
    // how many plant keywords co-occur.
    let cases = [
        "chicken, rice, tomato, spinach, lentil, quinoa, almond",
        "vegetable oil, wheat flour, fish extract",
        "soy, tofu, tempeh, gelatin",
        "oats, honey, almonds, egg white",
    ];
    for ingredients in cases {
        let (label, confidence) = classify(ingredients);
        assert_eq!(label, DietLabel::NonVegetarian, "for: {ingredients}");
        assert!(confidence >= 0.9, "for: {ingredients}");
    }
}

#[test]
fn word_boundaries_prevent_substring_false_positives() {
    assert_eq!(classify("eggplant, rice").0, DietLabel::PureVegetarian);
    assert_eq!(classify("egg, rice").0, DietLabel::NonVegetarian);
    // "ham" must not fire inside "graham".
    assert_eq!(classify("graham flour, water").0, DietLabel::PureVegetarian);
    assert_eq!(classify("ham, water").0, DietLabel::NonVegetarian);
}

#[test]
fn indian_dishes_classify_per_convention() {
    let cases = [
        ("basmati rice, chicken, onion, garlic, ghee, spices", DietLabel::NonVegetarian),
        ("paneer, tomato, cream, butter, onion, garlic, spices", DietLabel::Vegetarian),
        ("toor dal, turmeric, cumin, curry leaves, oil", DietLabel::PureVegetarian),
        ("eggs, onion, tomato, coconut milk, spices", DietLabel::NonVegetarian),
        ("chickpeas, wheat flour, yogurt, oil, spices", DietLabel::Vegetarian),
        ("fish, coconut, curry leaves, tamarind, spices", DietLabel::NonVegetarian),
    ];
    for (ingredients, expected) in cases {
        assert_eq!(classify(ingredients).0, expected, "for: {ingredients}");
    }
}

#[test]
fn jain_mode_restricts_root_vegetables_without_new_label() {
    let classifier = DietClassifier::new();
    let ingredients = "potato, cauliflower, onion, turmeric, oil";

    let normal = classifier.classify("", "", ingredients, false).unwrap();
    assert_eq!(normal.label, DietLabel::PureVegetarian);

    let jain = classifier.classify("", "", ingredients, true).unwrap();
    assert_eq!(jain.label, DietLabel::Vegetarian);
    assert!(jain.reason.contains("not suitable for Jain diet"));
}

#[test]
fn category_text_corroborates_without_flipping() {
    let classifier = DietClassifier::new();

    let result = classifier
        .classify("Chicken Breast", "Fresh Meat", "chicken breast, salt, pepper", false)
        .unwrap();
    assert_eq!(result.label, DietLabel::NonVegetarian);
    assert!(result.confidence > 0.95);
    assert!(result.confidence <= 0.98);

    // Plant indicators in the name never override a non-veg match.
    let result = classifier
        .classify("Vegan Style Snack", "", "whey powder, gelatin", false)
        .unwrap();
    assert_eq!(result.label, DietLabel::NonVegetarian);
}
