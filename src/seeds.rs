//! Built-in medical German question catalog.
//!
//! Every level carries at least as many questions as the default `max_questions`, so a
//! session never starves even when it stays inside one level band.

use crate::bank::{BankError, OptionSpec, QuestionSpec};
use crate::domain::{Level, Question};
use crate::domain::Level::{A1, A2, B1, B2, C1, C2};

struct Seed {
  id: &'static str,
  level: Level,
  topic: &'static str,
  text: &'static str,
  options: &'static [&'static str],
  correct: &'static str,
}

const fn s(
  id: &'static str,
  level: Level,
  topic: &'static str,
  text: &'static str,
  options: &'static [&'static str],
  correct: &'static str,
) -> Seed {
  Seed { id, level, topic, text, options, correct }
}

const SEEDS: &[Seed] = &[
  // A1
  s("a1-01", A1, "grammar", "Ich ___ Krankenpfleger.", &["bin", "bist", "ist", "sind"], "bin"),
  s("a1-02", A1, "vocabulary", "Was ist „der Arzt“ auf Englisch?", &["the doctor", "the nurse", "the patient", "the pharmacist"], "the doctor"),
  s("a1-03", A1, "healthcare", "Wo liegt ein Patient im Krankenhaus?", &["im Bett", "im Auto", "im Kino", "im Garten"], "im Bett"),
  s("a1-04", A1, "communication", "Wie begrüßen Sie einen Patienten am Morgen?", &["Guten Morgen!", "Gute Nacht!", "Tschüss!", "Mahlzeit!"], "Guten Morgen!"),
  s("a1-05", A1, "grammar", "___ heißen Sie?", &["Wie", "Wo", "Wer", "Wann"], "Wie"),
  s("a1-06", A1, "vocabulary", "Welches Wort ist ein Körperteil?", &["die Hand", "der Tisch", "das Fenster", "die Tür"], "die Hand"),
  s("a1-07", A1, "healthcare", "Ein Mensch mit Fieber ist ___.", &["krank", "hungrig", "müde", "reich"], "krank"),
  s("a1-08", A1, "grammar", "Das ist ___ Tablette.", &["eine", "ein", "einen", "einem"], "eine"),
  s("a1-09", A1, "communication", "Was sagen Sie, wenn Sie etwas nicht verstehen?", &["Wie bitte?", "Danke schön!", "Gute Besserung!", "Bis morgen!"], "Wie bitte?"),
  s("a1-10", A1, "vocabulary", "Was misst man mit einem Thermometer?", &["die Temperatur", "das Gewicht", "die Größe", "den Puls"], "die Temperatur"),
  s("a1-11", A1, "grammar", "Der Patient ___ Wasser.", &["trinkt", "trinken", "trinkst", "trinke"], "trinkt"),
  s("a1-12", A1, "healthcare", "Wer arbeitet in einer Apotheke?", &["der Apotheker", "der Bäcker", "der Lehrer", "der Koch"], "der Apotheker"),
  // A2
  s("a2-01", A2, "grammar", "Gestern ___ ich Nachtdienst.", &["hatte", "habe", "hat", "hätte"], "hatte"),
  s("a2-02", A2, "healthcare", "Wo tut es Ihnen ___?", &["weh", "gut", "leid", "schön"], "weh"),
  s("a2-03", A2, "vocabulary", "Ein anderes Wort für „Medikament“ ist ___.", &["Arznei", "Verband", "Spritze", "Pflaster"], "Arznei"),
  s("a2-04", A2, "communication", "Wie fragen Sie höflich nach dem Geburtsdatum?", &["Darf ich Ihr Geburtsdatum erfahren?", "Wie alt bist du?", "Geburtstag jetzt!", "Sie sind alt?"], "Darf ich Ihr Geburtsdatum erfahren?"),
  s("a2-05", A2, "grammar", "Nehmen Sie die Tabletten ___ dem Essen.", &["nach", "seit", "ohne", "gegen"], "nach"),
  s("a2-06", A2, "healthcare", "Bei einer Erkältung hat man oft ___.", &["Schnupfen", "einen Knochenbruch", "eine Allergie gegen Sonne", "Zahnschmerzen"], "Schnupfen"),
  s("a2-07", A2, "vocabulary", "Was braucht man für eine Wunde?", &["einen Verband", "einen Löffel", "eine Brille", "einen Schlüssel"], "einen Verband"),
  s("a2-08", A2, "grammar", "Ich habe ___ Kopf Schmerzen.", &["am", "im", "zum", "beim"], "am"),
  s("a2-09", A2, "communication", "Der Patient sagt „Mir ist schlecht.“ Was bedeutet das?", &["Ihm ist übel.", "Er ist traurig.", "Er ist müde.", "Er ist zufrieden."], "Ihm ist übel."),
  s("a2-10", A2, "healthcare", "Wohin bringt man einen Notfall?", &["in die Notaufnahme", "in die Cafeteria", "ins Archiv", "in die Wäscherei"], "in die Notaufnahme"),
  s("a2-11", A2, "grammar", "Sie müssen viel ___.", &["trinken", "trinkt", "getrunken", "trinkst"], "trinken"),
  s("a2-12", A2, "idioms", "„Gute Besserung!“ sagt man zu jemandem, der ___ ist.", &["krank", "verliebt", "verheiratet", "pünktlich"], "krank"),
  // B1
  s("b1-01", B1, "grammar", "Der Patient klagt ___ starke Kopfschmerzen.", &["über", "auf", "an", "mit"], "über"),
  s("b1-02", B1, "healthcare", "Was fragt man bei der Anamnese?", &["nach Vorerkrankungen", "nach dem Lieblingsfilm", "nach dem Urlaubsziel", "nach dem Gehalt"], "nach Vorerkrankungen"),
  s("b1-03", B1, "medical_terminology", "„Hypertonie“ bedeutet ___.", &["Bluthochdruck", "Unterzucker", "Fieber", "Atemnot"], "Bluthochdruck"),
  s("b1-04", B1, "grammar", "Wenn die Schmerzen stärker ___, rufen Sie bitte die Pflege.", &["werden", "wird", "wurden", "worden"], "werden"),
  s("b1-05", B1, "communication", "Wie erklären Sie einem Patienten eine Blutabnahme?", &["Ich nehme Ihnen jetzt etwas Blut ab, es piekst kurz.", "Blut jetzt.", "Arm her!", "Das tut nie weh, versprochen."], "Ich nehme Ihnen jetzt etwas Blut ab, es piekst kurz."),
  s("b1-06", B1, "vocabulary", "Welches Gerät misst den Blutdruck?", &["das Blutdruckmessgerät", "das Stethoskop", "das Skalpell", "der Rollstuhl"], "das Blutdruckmessgerät"),
  s("b1-07", B1, "grammar", "Der Arzt, ___ mich untersucht hat, war sehr freundlich.", &["der", "den", "dem", "dessen"], "der"),
  s("b1-08", B1, "healthcare", "Eine Übergabe findet statt, wenn ___.", &["der Schichtdienst wechselt", "der Patient isst", "die Besuchszeit beginnt", "das Labor schließt"], "der Schichtdienst wechselt"),
  s("b1-09", B1, "medical_terminology", "„Oral“ einnehmen heißt ___.", &["über den Mund", "über die Vene", "unter die Haut", "über die Haut"], "über den Mund"),
  s("b1-10", B1, "idioms", "„Das ist nicht mein Bier“ bedeutet: ___", &["Das ist nicht mein Problem.", "Ich trinke keinen Alkohol.", "Ich habe Durst.", "Das schmeckt mir nicht."], "Das ist nicht mein Problem."),
  s("b1-11", B1, "communication", "Wie fragen Sie nach der Schmerzstärke?", &["Wie stark sind die Schmerzen auf einer Skala von 0 bis 10?", "Sind Sie sicher?", "Warum haben Sie Schmerzen?", "Seit wann sind Sie hier?"], "Wie stark sind die Schmerzen auf einer Skala von 0 bis 10?"),
  s("b1-12", B1, "grammar", "Ich empfehle Ihnen, morgen nüchtern ___.", &["zu kommen", "kommen", "gekommen", "kommt"], "zu kommen"),
  // B2
  s("b2-01", B2, "grammar", "Die Medikation ___ bereits gestern angepasst.", &["wurde", "wird", "würde", "worden"], "wurde"),
  s("b2-02", B2, "medical_terminology", "Eine „Tachykardie“ ist ___.", &["ein zu schneller Herzschlag", "ein zu langsamer Herzschlag", "eine Lungenentzündung", "ein Knochenbruch"], "ein zu schneller Herzschlag"),
  s("b2-03", B2, "healthcare", "Was gehört in eine vollständige Medikamentenanamnese?", &["Dosierung, Einnahmezeitpunkt und Dauer", "nur der Handelsname", "nur die Farbe der Tablette", "nur der Preis"], "Dosierung, Einnahmezeitpunkt und Dauer"),
  s("b2-04", B2, "communication", "Wie reagieren Sie auf einen verunsicherten Angehörigen?", &["Ich verstehe Ihre Sorge. Lassen Sie uns die nächsten Schritte besprechen.", "Das ist nicht meine Aufgabe.", "Beruhigen Sie sich!", "Fragen Sie später nochmal."], "Ich verstehe Ihre Sorge. Lassen Sie uns die nächsten Schritte besprechen."),
  s("b2-05", B2, "grammar", "Hätte der Patient früher angerufen, ___ wir schneller handeln können.", &["hätten", "haben", "hatten", "würden"], "hätten"),
  s("b2-06", B2, "medical_terminology", "„Kontraindiziert“ bedeutet, dass ein Medikament ___.", &["nicht angewendet werden darf", "besonders empfohlen wird", "rezeptfrei ist", "teuer ist"], "nicht angewendet werden darf"),
  s("b2-07", B2, "vocabulary", "Ein „Befund“ ist ___.", &["das Ergebnis einer Untersuchung", "ein Krankenhausbett", "ein Rezept", "ein Termin"], "das Ergebnis einer Untersuchung"),
  s("b2-08", B2, "healthcare", "Wann muss eine Aufklärung vor einer Operation erfolgen?", &["rechtzeitig vorher, damit der Patient überlegen kann", "während der Narkose", "nach der Operation", "gar nicht"], "rechtzeitig vorher, damit der Patient überlegen kann"),
  s("b2-09", B2, "idioms", "„Jemandem auf den Zahn fühlen“ heißt ___.", &["jemanden genau prüfen", "zum Zahnarzt gehen", "Zahnschmerzen haben", "jemanden beißen"], "jemanden genau prüfen"),
  s("b2-10", B2, "grammar", "Trotz ___ Behandlung verschlechterte sich der Zustand.", &["der", "die", "den", "dem"], "der"),
  s("b2-11", B2, "communication", "Welche Formulierung passt in eine Übergabe?", &["Der Patient ist kreislaufstabil, die Vitalparameter sind unauffällig.", "Alles okay, glaube ich.", "Der Typ in Zimmer 4 nervt.", "Keine Ahnung, frag die Nachtschicht."], "Der Patient ist kreislaufstabil, die Vitalparameter sind unauffällig."),
  s("b2-12", B2, "medical_terminology", "Was ist eine „Anämie“?", &["Blutarmut", "Atemstillstand", "Nierenversagen", "Hautausschlag"], "Blutarmut"),
  // C1
  s("c1-01", C1, "grammar", "Die Patientin gab an, sie ___ seit Tagen unter Übelkeit.", &["leide", "leidet", "litt", "gelitten"], "leide"),
  s("c1-02", C1, "medical_terminology", "Eine „idiopathische“ Erkrankung ___.", &["hat keine erkennbare Ursache", "ist ansteckend", "ist erblich", "ist durch Medikamente ausgelöst"], "hat keine erkennbare Ursache"),
  s("c1-03", C1, "healthcare", "Was gehört in einen Arztbrief an den Hausarzt?", &["Diagnosen, Therapieverlauf und Empfehlungen zur Weiterbehandlung", "private Bemerkungen über den Patienten", "nur die Rechnung", "die Dienstpläne der Station"], "Diagnosen, Therapieverlauf und Empfehlungen zur Weiterbehandlung"),
  s("c1-04", C1, "communication", "Wie beginnen Sie ein Gespräch über eine schwere Diagnose?", &["Ich habe die Ergebnisse und möchte sie in Ruhe mit Ihnen besprechen.", "Es sieht schlecht aus.", "Sie haben Krebs.", "Lesen Sie den Befund selbst."], "Ich habe die Ergebnisse und möchte sie in Ruhe mit Ihnen besprechen."),
  s("c1-05", C1, "grammar", "Die ___ Untersuchung ergab keinen pathologischen Befund.", &["durchgeführte", "durchführende", "durchgeführt", "durchzuführen"], "durchgeführte"),
  s("c1-06", C1, "medical_terminology", "„Nosokomial“ bezeichnet eine Infektion, die ___.", &["im Krankenhaus erworben wurde", "von Tieren übertragen wurde", "angeboren ist", "durch Nahrung entsteht"], "im Krankenhaus erworben wurde"),
  s("c1-07", C1, "idioms", "„Etwas auf die leichte Schulter nehmen“ heißt ___.", &["etwas nicht ernst genug nehmen", "etwas tragen", "Schulterschmerzen haben", "etwas sorgfältig prüfen"], "etwas nicht ernst genug nehmen"),
  s("c1-08", C1, "healthcare", "Was ist bei einer Patientenverfügung zu beachten?", &["Sie gibt den vorab festgelegten Willen des Patienten wieder.", "Sie gilt nur im Urlaub.", "Sie ersetzt die Krankenversicherung.", "Der Arzt darf sie ignorieren."], "Sie gibt den vorab festgelegten Willen des Patienten wieder."),
  s("c1-09", C1, "grammar", "Die Nebenwirkungen sind ___ der Dosis zu beobachten.", &["unabhängig von", "ungeachtet", "anstatt", "mittels"], "unabhängig von"),
  s("c1-10", C1, "vocabulary", "Welches Verb passt? „Einen Verdacht ___“", &["äußern", "machen", "tun", "stellen"], "äußern"),
  s("c1-11", C1, "communication", "Wie formulieren Sie eine Bitte an einen Oberarzt am höflichsten?", &["Hätten Sie kurz Zeit, sich den Befund gemeinsam mit mir anzusehen?", "Schauen Sie sich das an.", "Sie müssen jetzt kommen.", "Kommst du mal?"], "Hätten Sie kurz Zeit, sich den Befund gemeinsam mit mir anzusehen?"),
  s("c1-12", C1, "medical_terminology", "Was beschreibt eine „Differentialdiagnose“?", &["alternative Erkrankungen mit ähnlichen Symptomen", "die endgültige Diagnose", "eine Laboruntersuchung", "ein Operationsverfahren"], "alternative Erkrankungen mit ähnlichen Symptomen"),
  // C2
  s("c2-01", C2, "grammar", "___ der Tatsache, dass die Werte stabil sind, verzichten wir auf eine Kontrolle.", &["Angesichts", "Trotz", "Statt", "Infolgedessen"], "Angesichts"),
  s("c2-02", C2, "idioms", "„Mit einem blauen Auge davonkommen“ bedeutet ___.", &["ohne großen Schaden davonkommen", "ein Hämatom haben", "sich prügeln", "müde sein"], "ohne großen Schaden davonkommen"),
  s("c2-03", C2, "medical_terminology", "„Iatrogen“ bedeutet, dass ein Schaden ___.", &["durch ärztliches Handeln verursacht wurde", "genetisch bedingt ist", "durch Unfall entstand", "psychisch bedingt ist"], "durch ärztliches Handeln verursacht wurde"),
  s("c2-04", C2, "healthcare", "Wann darf die Schweigepflicht durchbrochen werden?", &["bei einem rechtfertigenden Notstand oder gesetzlicher Meldepflicht", "wenn Angehörige neugierig sind", "auf Wunsch des Arbeitgebers", "nie, unter keinen Umständen"], "bei einem rechtfertigenden Notstand oder gesetzlicher Meldepflicht"),
  s("c2-05", C2, "grammar", "Die Therapie ist, ___ sie frühzeitig begonnen wird, meist erfolgreich.", &["sofern", "obwohl", "damit", "indem"], "sofern"),
  s("c2-06", C2, "communication", "Welche Antwort entkräftet den Vorwurf eines Angehörigen am sachlichsten?", &["Ich kann Ihren Ärger nachvollziehen und erläutere Ihnen gern, wie die Entscheidung zustande kam.", "Das stimmt einfach nicht.", "Beschweren Sie sich doch.", "Dafür bin ich nicht zuständig."], "Ich kann Ihren Ärger nachvollziehen und erläutere Ihnen gern, wie die Entscheidung zustande kam."),
  s("c2-07", C2, "idioms", "„Den Teufel mit dem Beelzebub austreiben“ heißt ___.", &["ein Übel durch ein ebenso schlimmes ersetzen", "eine Krankheit heilen", "sehr religiös sein", "vorsichtig handeln"], "ein Übel durch ein ebenso schlimmes ersetzen"),
  s("c2-08", C2, "medical_terminology", "Was bedeutet „inapparent“ bei einer Infektion?", &["ohne klinische Symptome", "besonders schwer", "chronisch", "ansteckend über Luft"], "ohne klinische Symptome"),
  s("c2-09", C2, "grammar", "Es sei darauf hingewiesen, dass die Studie nur begrenzt ___ ist.", &["aussagekräftig", "aussagend", "ausgesagt", "aussagbar"], "aussagekräftig"),
  s("c2-10", C2, "vocabulary", "Welches Wort ist ein Synonym für „lindern“?", &["mildern", "verschärfen", "verursachen", "verschweigen"], "mildern"),
  s("c2-11", C2, "healthcare", "Was kennzeichnet eine „informierte Einwilligung“?", &["Der Patient stimmt nach verständlicher Aufklärung über Nutzen und Risiken zu.", "Der Patient unterschreibt ohne Erklärung.", "Die Angehörigen entscheiden allein.", "Die Einwilligung erfolgt nachträglich."], "Der Patient stimmt nach verständlicher Aufklärung über Nutzen und Risiken zu."),
  s("c2-12", C2, "communication", "Wie relativieren Sie eine Prognose angemessen?", &["Statistisch ist das der häufigste Verlauf, im Einzelfall kann es jedoch anders kommen.", "Sie werden sicher wieder gesund.", "Da ist nichts mehr zu machen.", "Prognosen sind Unsinn."], "Statistisch ist das der häufigste Verlauf, im Einzelfall kann es jedoch anders kommen."),
];

/// Catalog questions with options normalized to `{id, text}` pairs (`id = text`).
/// Any malformed entry fails the whole catalog.
pub fn seed_questions() -> Result<Vec<Question>, BankError> {
  normalize_seeds(SEEDS)
}

fn normalize_seeds(seeds: &[Seed]) -> Result<Vec<Question>, BankError> {
  seeds
    .iter()
    .map(|seed| {
      QuestionSpec {
        id: seed.id.to_string(),
        text: seed.text.to_string(),
        options: seed.options.iter().map(|o| OptionSpec::Text(o.to_string())).collect(),
        correct_answer: seed.correct.to_string(),
        difficulty: seed.level,
        topic: seed.topic.to_string(),
      }
      .normalize()
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn every_seed_normalizes() {
    assert_eq!(seed_questions().unwrap().len(), SEEDS.len());
  }

  #[test]
  fn malformed_seed_is_an_error_not_dropped() {
    let seeds = [
      s("ok-1", A1, "grammar", "Ich ___ Arzt.", &["bin", "bist"], "bin"),
      s("bad-1", A1, "grammar", "Kaputt", &["x", "y"], "z"),
    ];
    let err = normalize_seeds(&seeds).unwrap_err();
    assert_eq!(err, BankError::CorrectAnswerMissing { id: "bad-1".into(), answer: "z".into() });
  }

  #[test]
  fn seeds_span_all_levels_and_topics() {
    let questions = seed_questions().unwrap();
    for level in Level::ALL {
      assert!(questions.iter().any(|q| q.difficulty == level), "no seed for {level}");
    }
    assert!(questions.iter().any(|q| q.topic == "healthcare"));
    assert!(questions.iter().any(|q| q.topic == "idioms"));
  }
}
