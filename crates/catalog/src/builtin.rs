use crate::RestaurantRecord;

struct Entry {
    name: &'static str,
    atmosphere: &'static str,
    exterior: &'static str,
    menu: &'static str,
    product: &'static str,
    price: u32,
    address: &'static str,
    demographics: u8,
}

const ENTRIES: [Entry; 7] = [
    Entry {
        name: "喫茶店 木漏れ日",
        atmosphere: "静かで落ち着いた雰囲気で、読書や一人でくつろぐのに最適です。穏やかなBGMが流れています。",
        exterior: "https://placehold.co/400x250/E6B08F/FFFFFF?text=Cafe+Exterior",
        menu: "本日のコーヒー、手作りケーキ、サンドイッチなど",
        product: "https://placehold.co/300x200/F5CBA7/FFFFFF?text=Coffee+%26+Cake",
        price: 800,
        address: "東京都渋谷区",
        demographics: 3,
    },
    Entry {
        name: "活気ある居酒屋 🏮笑顔亭",
        atmosphere: "ワイワイ賑やかで、友人と楽しくお酒を飲むのにぴったりです。活気があります。",
        exterior: "https://placehold.co/400x250/C8A2C8/FFFFFF?text=Izakaya+Exterior",
        menu: "焼き鳥、刺身、ビール、日本酒",
        product: "https://placehold.co/300x200/FFD700/FFFFFF?text=Yakitori+%26+Beer",
        price: 3500,
        address: "大阪府中央区",
        demographics: 8,
    },
    Entry {
        name: "オーガニックレストラン 緑の風",
        atmosphere: "自然光が差し込む明るく開放的な空間で、健康的な食事が楽しめます。ベジタリアンフレンドリー。",
        exterior: "https://placehold.co/400x250/8FBC8F/FFFFFF?text=Organic+Restaurant",
        menu: "季節の野菜プレート、スムージー、グルテンフリーパン",
        product: "https://placehold.co/300x200/A2D9CE/FFFFFF?text=Veggie+Plate",
        price: 2000,
        address: "福岡県天神",
        demographics: 5,
    },
    Entry {
        name: "隠れ家バー Moonlight",
        atmosphere: "落ち着いた照明で、大人の雰囲気が漂うシックなバーです。デートやゆっくり過ごしたい時に。",
        exterior: "https://placehold.co/400x250/465B7C/FFFFFF?text=Bar+Exterior",
        menu: "カクテル、ウイスキー、軽食",
        product: "https://placehold.co/300x200/708090/FFFFFF?text=Cocktail",
        price: 5000,
        address: "北海道札幌市",
        demographics: 4,
    },
    Entry {
        name: "家族で楽しめるレストラン ハッピーダイニング",
        atmosphere: "子供連れに優しい、明るくカジュアルな雰囲気のレストランです。広々とした空間で食事を楽しめます。",
        exterior: "https://placehold.co/400x250/ADD8E6/FFFFFF?text=Family+Restaurant",
        menu: "お子様ランチ、ハンバーグ、パスタ",
        product: "https://placehold.co/300x200/FFDAB9/FFFFFF?text=Kids+Meal",
        price: 1500,
        address: "沖縄県那覇市",
        demographics: 7,
    },
    Entry {
        name: "モダンな和食処 結",
        atmosphere: "洗練されたモダンな空間で、本格的な和食を静かに楽しめます。接待や特別な日にも最適です。",
        exterior: "https://placehold.co/400x250/808080/FFFFFF?text=Japanese+Restaurant",
        menu: "寿司、天ぷら、会席料理",
        product: "https://placehold.co/300x200/D3D3D3/FFFFFF?text=Sushi",
        price: 6000,
        address: "京都府京都市",
        demographics: 2,
    },
    Entry {
        name: "ブックカフェ 栞",
        atmosphere: "多くの本が並ぶ静かな空間で、コーヒーを飲みながら読書を楽しめます。作業にも集中できます。",
        exterior: "https://placehold.co/400x250/A9A9A9/FFFFFF?text=Book+Cafe",
        menu: "スペシャルティコーヒー、軽食、デザート",
        product: "https://placehold.co/300x200/C0C0C0/FFFFFF?text=Book+Cafe+Interior",
        price: 900,
        address: "神奈川県横浜市",
        demographics: 3,
    },
];

pub(crate) fn records() -> Vec<RestaurantRecord> {
    ENTRIES
        .iter()
        .map(|e| RestaurantRecord {
            name: e.name.to_string(),
            atmosphere_description: e.atmosphere.to_string(),
            exterior_image_url: e.exterior.to_string(),
            menu_text: e.menu.to_string(),
            product_image_url: e.product.to_string(),
            average_price: e.price,
            address: e.address.to_string(),
            customer_demographics_score: e.demographics,
        })
        .collect()
}
