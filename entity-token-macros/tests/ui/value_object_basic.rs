use entity_token_macros::value_object;

#[value_object]
struct Label {
    text: String,
}

#[value_object(hash = false)]
struct Weight(u32);

#[value_object]
#[derive(Copy)]
#[serde(rename_all = "lowercase")]
enum Scope {
    #[default]
    Public,
    Administrated,
}

fn main() {
    let a = Label::default();
    let _ = format!("{:?}", a.clone());
    let _eq = a == Label { text: String::new() };

    // hash = false 时只保证构造与比较
    let _ = Weight(1) == Weight(1);

    let s: Scope = Default::default();
    let _copied = s;
    let _ = s == Scope::Administrated;
}
