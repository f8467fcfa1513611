//! Tool execution against an in-memory workspace with scripted providers.

mod helpers;

use serde_json::json;

use helpers::*;
use memorunia::config::RetrievalConfig;
use memorunia::tools::ToolExecutor;

macro_rules! executor {
    ($ws:expr, $embedding:expr, $chat:expr) => {
        ToolExecutor {
            workspace: &mut $ws,
            embedding: &$embedding,
            chat: &$chat,
            calendar: None,
            retrieval: &RetrievalConfig::default(),
        }
    };
}

#[tokio::test]
async fn create_note_embeds_and_prepends() {
    let mut ws = test_workspace();
    ws.insert_note(embedded_note("Existing", "x", 1)).unwrap();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute(
            "createNote",
            &json!({ "title": "Pancakes", "content": "Flour, eggs, milk." }),
        )
        .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["message"], "Note created successfully.");
    let id = result["noteId"].as_str().unwrap().to_string();

    let note = ws.find_note(&id).unwrap();
    assert_eq!(ws.notes()[0].id, id); // newest first
    assert!(note.is_generated);
    assert_eq!(note.embedding.as_deref(), Some(&test_embedding(0)[..]));
}

#[tokio::test]
async fn create_note_survives_embedding_outage() {
    let mut ws = test_workspace();
    let embedding = FailingEmbedding;
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("createNote", &json!({ "title": "T", "content": "C" }))
        .await;

    assert_eq!(result["success"], true);
    assert_eq!(ws.notes()[0].embedding.as_deref(), Some(&[][..]));
}

#[tokio::test]
async fn update_note_misses_with_exact_message() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("updateNote", &json!({ "noteId": "ghost", "title": "New" }))
        .await;
    assert_eq!(result["error"], "Note not found.");
}

#[tokio::test]
async fn update_note_changes_fields_and_reembeds() {
    let mut ws = test_workspace();
    let note = embedded_note("Old title", "old content", 1);
    let id = note.id.clone();
    ws.insert_note(note).unwrap();

    let embedding = FakeEmbedding::new(3);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("updateNote", &json!({ "noteId": id, "content": "new content" }))
        .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["message"], "Note updated.");
    let updated = ws.find_note(&id).unwrap();
    assert_eq!(updated.title, "Old title");
    assert_eq!(updated.content, "new content");
    assert_eq!(updated.embedding.as_deref(), Some(&test_embedding(3)[..]));
}

#[tokio::test]
async fn delete_note_reports_title() {
    let mut ws = test_workspace();
    let note = embedded_note("Groceries", "milk", 0);
    let id = note.id.clone();
    ws.insert_note(note).unwrap();

    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec.execute("deleteNote", &json!({ "noteId": id })).await;
    assert_eq!(result["message"], "Note 'Groceries' deleted.");
    assert!(ws.notes().is_empty());

    let mut exec = executor!(ws, embedding, chat);
    let miss = exec.execute("deleteNote", &json!({ "noteId": id })).await;
    assert_eq!(miss["error"], "Note not found.");
}

#[tokio::test]
async fn search_notes_ranks_and_flags_relevance() {
    let mut ws = test_workspace();
    ws.insert_note(embedded_note("Hit", "about cats", 0)).unwrap();
    ws.insert_note(embedded_note("Miss", "about tax law", 1)).unwrap();

    let embedding = FakeEmbedding::new(0); // query lands on the cat spike
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec.execute("searchNotes", &json!({ "query": "cats" })).await;
    let results = result["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["title"], "Hit");
    assert!(result["message"]
        .as_str()
        .unwrap()
        .contains("1 are highly relevant"));
}

#[tokio::test]
async fn rag_answer_refuses_without_calling_the_model() {
    let mut ws = test_workspace();
    let note = embedded_note("Unrelated", "tax law", 1);
    let id = note.id.clone();
    ws.insert_note(note).unwrap();

    // FakeChat has no scripted text reply: a generation attempt would come
    // back as "Error generating answer." instead of the refusal.
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("ragAnswer", &json!({ "query": "cats?", "candidateNoteIds": [id] }))
        .await;

    assert_eq!(
        result["answer"],
        memorunia::tools::rag_answer::REFUSAL
    );
    assert_eq!(result["usedNoteIds"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn rag_answer_attributes_relevant_sources() {
    let mut ws = test_workspace();
    let note = embedded_note("Cats", "cats are great", 0);
    let id = note.id.clone();
    ws.insert_note(note).unwrap();

    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new().with_text_reply("Cats are great.\n\n**Sources:**\n- Cats");
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("ragAnswer", &json!({ "query": "cats?", "candidateNoteIds": [id] }))
        .await;

    assert_eq!(result["answer"], "Cats are great.\n\n**Sources:**\n- Cats");
    assert_eq!(result["usedNoteIds"], json!([id]));
}

#[tokio::test]
async fn cluster_notes_replaces_collection_wholesale() {
    let mut ws = test_workspace();
    let a = embedded_note("Pasta", "boil water", 0);
    let b = embedded_note("Rust", "borrow checker", 1);
    let (id_a, id_b) = (a.id.clone(), b.id.clone());
    ws.insert_note(a).unwrap();
    ws.insert_note(b).unwrap();
    ws.replace_clusters(vec![memorunia::notes::types::Cluster {
        id: "cluster-stale".into(),
        name: "Old".into(),
        note_ids: vec![],
    }])
    .unwrap();

    let reply = format!(
        r#"[{{"name": "Cooking", "noteIds": ["{id_a}"]}}, {{"name": "Programming", "noteIds": ["{id_b}"]}}]"#
    );
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new().with_json_reply(&reply);
    let mut exec = executor!(ws, embedding, chat);

    let result = exec.execute("clusterNotes", &json!({})).await;
    assert_eq!(result["success"], true);
    assert_eq!(result["clusters"], json!(["Cooking", "Programming"]));

    assert_eq!(ws.clusters().len(), 2);
    assert!(ws.clusters().iter().all(|c| c.id != "cluster-stale"));

    // Assignments are stamped back onto the notes.
    let cooking_id = &ws.clusters()[0].id;
    assert_eq!(ws.find_note(&id_a).unwrap().cluster_id.as_ref(), Some(cooking_id));
}

#[tokio::test]
async fn cluster_failure_empties_clusters() {
    let mut ws = test_workspace();
    ws.insert_note(embedded_note("A", "a", 0)).unwrap();
    ws.replace_clusters(vec![memorunia::notes::types::Cluster {
        id: "cluster-old".into(),
        name: "Old".into(),
        note_ids: vec![],
    }])
    .unwrap();

    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new(); // no json reply scripted
    let mut exec = executor!(ws, embedding, chat);

    let result = exec.execute("clusterNotes", &json!({})).await;
    assert_eq!(result["success"], true);
    assert!(ws.clusters().is_empty());
}

#[tokio::test]
async fn open_and_summarize_use_unpunctuated_not_found() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let open = exec.execute("openNote", &json!({ "noteId": "ghost" })).await;
    assert_eq!(open["error"], "Note not found");

    let mut exec = executor!(ws, embedding, chat);
    let summarize = exec
        .execute("summarizeNote", &json!({ "noteId": "ghost" }))
        .await;
    assert_eq!(summarize["error"], "Note not found");
}

#[tokio::test]
async fn rewrite_note_saves_new_content() {
    let mut ws = test_workspace();
    let note = embedded_note("Draft", "teh quick fox", 0);
    let id = note.id.clone();
    ws.insert_note(note).unwrap();

    let embedding = FakeEmbedding::new(2);
    let chat = FakeChat::new().with_text_reply("The quick fox.");
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute(
            "rewriteNote",
            &json!({ "noteId": id, "instruction": "fix grammar" }),
        )
        .await;

    assert_eq!(result["message"], "Note rewritten and saved.");
    let saved = ws.find_note(&id).unwrap();
    assert_eq!(saved.content, "The quick fox.");
    assert_eq!(saved.embedding.as_deref(), Some(&test_embedding(2)[..]));
}

#[tokio::test]
async fn calendar_event_requires_configuration() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("createCalendarEvent", &json!({ "text": "Dentist tomorrow 3pm" }))
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["error"], "Google Calendar is not configured.");
}

#[tokio::test]
async fn calendar_event_quick_adds_when_configured() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let calendar = FakeCalendar::default();
    let mut exec = ToolExecutor {
        workspace: &mut ws,
        embedding: &embedding,
        chat: &chat,
        calendar: Some(&calendar),
        retrieval: &RetrievalConfig::default(),
    };

    let result = exec
        .execute("createCalendarEvent", &json!({ "text": "Dentist tomorrow 3pm" }))
        .await;

    assert_eq!(result["success"], true);
    assert_eq!(result["eventId"], "evt-1");
    assert_eq!(calendar.added.lock().unwrap()[0], "Dentist tomorrow 3pm");
}

#[tokio::test]
async fn unknown_tool_is_reported_as_data() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec.execute("archiveNote", &json!({})).await;
    assert_eq!(result["error"], "Unknown tool: archiveNote");
}

#[tokio::test]
async fn bad_arguments_come_back_as_data() {
    let mut ws = test_workspace();
    let embedding = FakeEmbedding::new(0);
    let chat = FakeChat::new();
    let mut exec = executor!(ws, embedding, chat);

    let result = exec
        .execute("createNote", &json!({ "title": "missing content" }))
        .await;
    let error = result["error"].as_str().unwrap();
    assert!(error.starts_with("Invalid arguments for createNote:"));
}
