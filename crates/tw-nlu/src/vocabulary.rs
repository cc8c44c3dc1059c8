//! Fixed vocabularies used by the topic classifier.

/// Restaurant and dining terms. Matched against whole tokens.
pub const DOMAIN_KEYWORDS: &[&str] = &[
    // Venue & service
    "restaurant", "restaurants", "dining", "dine", "diner", "cafe", "bistro", "eatery",
    "table", "tables", "booth", "seat", "seats", "seating", "patio", "terrace", "outdoor",
    "indoor", "bar", "lounge", "waiter", "waitress", "server", "chef", "chefs", "kitchen",
    "staff", "host", "service",
    // Reservations & visits
    "reservation", "reservations", "reserve", "book", "booking", "bookings", "party",
    "guests", "guest", "people", "group", "walk-in", "availability", "available",
    "cancel", "cancellation", "private", "event", "events", "celebration", "birthday",
    "anniversary", "catering",
    // Hours & location
    "open", "opening", "close", "closing", "hours", "time", "today", "tonight",
    "tomorrow", "weekend", "holiday", "location", "address", "directions", "parking",
    "nearby", "located", "where",
    // Meals
    "menu", "menus", "food", "dish", "dishes", "meal", "meals", "eat", "eating",
    "breakfast", "brunch", "lunch", "dinner", "supper", "buffet", "appetizer",
    "appetizers", "starter", "starters", "entree", "entrees", "main", "mains", "dessert",
    "desserts", "special", "specials", "course", "portion", "portions", "snack", "snacks",
    // Cuisine
    "cuisine", "indian", "curry", "curries", "biryani", "naan", "roti", "paratha",
    "tandoori", "tikka", "masala", "korma", "vindaloo", "dal", "daal", "paneer", "samosa",
    "samosas", "pakora", "chutney", "raita", "kebab", "kebabs", "thali", "dosa", "rice",
    "bread", "chicken", "lamb", "mutton", "fish", "prawn", "prawns", "seafood", "goat",
    "vegetable", "vegetables", "spices", "spice", "spicy", "mild", "hot", "flavor",
    "flavour", "taste", "recipe", "recipes",
    // Dietary
    "vegetarian", "vegan", "gluten", "gluten-free", "halal", "kosher", "allergy",
    "allergies", "allergen", "allergens", "dairy", "nut", "nuts", "diet", "dietary",
    "healthy", "ingredients",
    // Drinks
    "drink", "drinks", "beverage", "beverages", "wine", "beer", "cocktail", "cocktails",
    "lassi", "chai", "tea", "coffee", "juice", "water", "alcohol",
    // Orders & money
    "order", "ordering", "takeout", "takeaway", "delivery", "deliver", "pickup", "price",
    "prices", "cost", "expensive", "cheap", "bill", "payment", "pay", "card", "cash",
    "tip", "discount", "offer", "offers", "deal", "deals", "voucher", "gift",
    // Atmosphere
    "ambiance", "ambience", "atmosphere", "music", "dress", "code", "kids", "children",
    "family", "wheelchair", "accessible", "wifi", "review", "reviews", "recommend",
    "recommendation", "recommendations", "popular", "signature", "favorite", "favourite",
];

/// Interrogative and auxiliary words that open a genuine question.
pub const QUESTION_OPENERS: &[&str] = &[
    "how", "what", "when", "where", "why", "is", "are", "can", "do", "does", "will",
];

/// Off-domain patterns, searched over the whole lowercased text.
/// Each pattern counts once no matter how often it matches.
pub const OFF_DOMAIN_PATTERNS: &[&str] = &[
    // Politics & news
    r"\b(politics?|political|election|elections|president|government|senate|congress|parliament)\b",
    r"\b(news|headlines?)\b",
    // Sports
    r"\b(football|soccer|basketball|baseball|tennis|nba|nfl|olympics?|world cup)\b",
    // Weather
    r"\b(weather|forecast|hurricane|snowfall)\b",
    // Finance
    r"\b(stocks?|stock market|crypto\w*|bitcoin|forex|mortgage|interest rates?)\b",
    // Technology
    r"\b(programming|software|computer|javascript|python|smartphone|iphone|android)\b",
    // Science
    r"\b(physics|chemistry|biology|quantum|planets?|universe|galaxy)\b",
    // Content generation
    r"\b(write|compose|generate|draft)\b.*\b(poem|essay|story|song|code|letter|article|script)\b",
    // Historical & theoretical
    r"\bhistory of\b",
    r"\b(wars?|ancient|empire|revolution)\b",
    r"\b(theory|theories|philosophy|meaning of life)\b",
    // Risky how-tos
    r"\bhow (do i |can i |to )?(hack|invest)\b",
];
