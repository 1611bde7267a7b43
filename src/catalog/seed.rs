use crate::domain::Product;

/// The fixed product set the server starts with.
pub fn seed_products() -> Vec<Product> {
    vec![
        Product::new(1, "Python Programming eBook", 10.99, 25),
        Product::new(2, "Photo Editing License", 29.99, 17),
        Product::new(3, "Study Playlist MP3", 5.99, 17),
        Product::new(4, "Adobe Photoshop", 19.99, 25),
        Product::new(5, "Mystery Gift", 20.99, 10),
        Product::new(6, "Amazon Gift Card", 10.99, 20),
    ]
}
