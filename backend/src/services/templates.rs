//! Subscriber-facing email copy.

use shared::models::{DiaryEntry, PetProfile};

use crate::mail::OutgoingEmail;

/// Display name used for all outbound mail.
pub const SENDER_NAME: &str = "たびぺっち";

/// Welcome mail sent after pet creation, introducing the persona.
pub fn welcome(to: &str, profile: &PetProfile) -> OutgoingEmail {
    let subject = "[旅ペット作成完了]".to_string();

    let text = format!(
        "\nこんにちは、たびぺっち運営チームです。\n\n\
あなたの旅ペット「{name}」が誕生しました！\n\n\
{introduction}\n\n\
これからこのペットが毎日旅日記をお届けします。\n\
どんな冒険が待っているか、お楽しみに。\n\n\
※ペットの旅は数日で終了します。\n\
※配信停止は件名に「配信停止」と書いたメールを送るだけで可能です。旅を終えると以降のメールは届きません。\n\
※終了時には登録情報を削除し、メールアドレスを他に利用することはありません。\n\n\
旅するデジタルペット『たびぺっち』チーム\n",
        name = profile.name,
        introduction = profile.introduction,
    );

    let html = format!(
        "<p>こんにちは、たびぺっち運営チームです。</p>\
<p>あなたの旅ペット「{name}」が誕生しました！</p>\
<p>{introduction}</p>\
<p>これからこのペットが毎日旅日記をお届けします。<br>どんな冒険が待っているか、お楽しみに。</p>\
<p style=\"font-size:smaller;\">ペットの旅は数日で終了します。</p>\
<p style=\"font-size:smaller;\">配信停止は件名に「配信停止」と書いたメールを送るだけで可能です。旅を終えると以降のメールは届きません。</p>\
<p style=\"font-size:smaller;\">終了時には登録情報を削除し、メールアドレスを他に利用することはありません。</p>\
<p>旅するデジタルペット『たびぺっち』チーム</p>",
        name = profile.name,
        introduction = profile.introduction.replace('\n', "<br>"),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject,
        text,
        html: Some(html),
    }
}

/// Daily diary mail for one entry.
pub fn diary(to: &str, entry: &DiaryEntry) -> OutgoingEmail {
    let subject = format!("[旅日記] {}", entry.itinerary.selected_location);

    let text = format!(
        "\nこんにちは！\n\n\
今日の旅日記をお届けします📖\n\n\
{diary}\n\n\
それでは、また明日の冒険をお楽しみに！\n\n\
あなたの旅ペットより\n",
        diary = entry.diary,
    );

    let image = entry
        .image_url
        .as_deref()
        .map(|url| format!("<img src=\"{url}\" alt=\"diary image\"/>"))
        .unwrap_or_default();

    let html = format!(
        "<p>こんにちは！</p>\
<p>今日の旅日記をお届けします📖</p>\
<p>{diary}</p>\
{image}\
<p>それでは、また明日の冒険をお楽しみに！</p>\
<p>あなたの旅ペットより</p>",
        diary = entry.diary.replace('\n', "<br>"),
    );

    OutgoingEmail {
        to: to.to_string(),
        subject,
        text,
        html: Some(html),
    }
}

/// Farewell mail sent when a pet's lifespan runs out.
pub fn farewell(to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "[旅ペットとのお別れ]".to_string(),
        text: "\nこんにちは、たびぺっち運営チームです。\n\n\
あなたの旅ペットの冒険は終了しました。\n\
短い旅でしたが、一緒に楽しんでいただけていたらうれしいです。\n\n\
登録情報はすべて削除しました。以降のメールは届きません。\n\
またいつか、新しい旅ペットとお会いできますように。\n\n\
旅するデジタルペット『たびぺっち』チーム\n"
            .to_string(),
        html: None,
    }
}

/// Confirmation mail for an unsubscribe request.
pub fn unsubscribe_confirmation(to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "[配信停止完了]".to_string(),
        text: "\nこんにちは、たびぺっち運営チームです。\n\n\
配信停止を受け付けました。旅ペットの登録情報を削除し、以降のメールは届きません。\n\n\
ご利用ありがとうございました。\n\n\
旅するデジタルペット『たびぺっち』チーム\n"
            .to_string(),
        html: None,
    }
}

/// Notice for a signup from an address that already has a live pet.
pub fn already_registered(to: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "[旅ペット登録済み]".to_string(),
        text: "\nこんにちは、たびぺっち運営チームです。\n\n\
このメールアドレスにはすでに旅ペットが登録されています。\n\
いまのペットの旅が終わるまで、新しいペットはお迎えできません。\n\n\
引き続き旅日記をお楽しみください。\n\n\
旅するデジタルペット『たびぺっち』チーム\n"
            .to_string(),
        html: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{Destination, PersonaDna};

    #[test]
    fn farewell_mentions_the_journey_ending() {
        let mail = farewell("user@example.com");
        assert_eq!(mail.subject, "[旅ペットとのお別れ]");
        assert!(mail.text.contains("冒険は終了"));
    }

    #[test]
    fn welcome_carries_name_and_introduction() {
        let profile = PetProfile {
            name: "ぽち".to_string(),
            persona_dna: PersonaDna {
                personality: "a".to_string(),
                guiding_theme: "b".to_string(),
                emotional_trigger: "c".to_string(),
                mobility_range: "d".to_string(),
                interest_depth: "e".to_string(),
                temporal_focus: "f".to_string(),
            },
            introduction: "ぼく、ぽち！\nよろしくね。".to_string(),
        };
        let mail = welcome("user@example.com", &profile);
        assert!(mail.text.contains("ぽち"));
        assert!(mail.text.contains("ぼく、ぽち！"));
        assert!(mail.html.as_ref().unwrap().contains("ぼく、ぽち！<br>よろしくね。"));
    }

    #[test]
    fn diary_subject_names_the_location() {
        let entry = DiaryEntry {
            itinerary: Destination {
                selected_location: "函館".to_string(),
                summary: "s".to_string(),
                news_context: "n".to_string(),
                local_details: "l".to_string(),
            },
            diary: "朝市へ行った。".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(2026, 8, 29).unwrap(),
            image_url: Some("data:image/png;base64,xyz".to_string()),
        };
        let mail = diary("user@example.com", &entry);
        assert_eq!(mail.subject, "[旅日記] 函館");
        assert!(mail.html.as_ref().unwrap().contains("img src=\"data:image/png;base64,xyz\""));
    }
}
