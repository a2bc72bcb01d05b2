use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use mushaf::addressing::{fallback_verse_audio_url, verse_audio_url, word_audio_url};
use mushaf::api::{ApiClient, BookmarkKind, QuranApi};
use mushaf::invocation::{Invocation, should_show};
use mushaf::reader::Reader;
use mushaf::word_detail::{WordRef, resolve_word};
use mushaf::{App, Config};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mushaf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Surah to open in the reader
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..=114))]
    surah: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all surahs
    Chapters,
    /// Print one page of a surah
    Show {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=114))]
        surah: u16,
        /// Page to print
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Verses per page (defaults to the configured size)
        #[arg(long)]
        page_size: Option<usize>,
    },
    /// Print the audio URLs of a verse or one of its words
    Audio {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=114))]
        surah: u16,
        ayah: u16,
        /// 1-based word index
        word: Option<u16>,
    },
    /// Look up a single word
    Word {
        #[arg(value_parser = clap::value_parser!(u16).range(1..=114))]
        surah: u16,
        ayah: u16,
        /// 1-based word index
        word: u16,
    },
    /// Bookmark a verse by its id
    Bookmark { verse_id: u64 },
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| "mushaf=info".into())
}

/// Log to a file while the terminal is taken over by the UI
fn init_file_logging() -> Result<()> {
    let path = Config::log_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .init();
    Ok(())
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(filter())
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;

    let Some(command) = cli.command else {
        // Launch TUI
        init_file_logging()?;
        let surah = cli.surah.unwrap_or(config.default_surah);
        let mut app = App::new(config)?;
        app.run(surah).await?;
        return Ok(());
    };

    init_stderr_logging();
    let api = ApiClient::new(&config).context("Failed to create API client")?;

    match command {
        Commands::Chapters => {
            let chapters = api.chapters().await.context("Cannot load surahs")?;
            for chapter in chapters {
                let mut line = chapter.label();
                if let Some(kind) = &chapter.revelation_type {
                    line.push_str(&format!(" · {}", kind));
                }
                if let Some(total) = chapter.total_verses {
                    line.push_str(&format!(" · {} verses", total));
                }
                println!("{}", line);
            }
        }
        Commands::Show { surah, page, page_size } => {
            let mut reader = Reader::new(page_size.unwrap_or(config.page_size()).max(1));
            let ticket = reader.begin_load(surah);
            let result = api.chapter(surah).await;
            if let Err(e) = &result {
                bail!("Cannot load surah {}: {}", surah, e);
            }
            reader.finish_load(ticket, result, "");

            let total = reader.pagination.total_pages();
            if page == 0 || page > total {
                bail!("Page {} out of range (1-{})", page, total);
            }
            reader.pagination.go_to(page);

            if let Some(chapter) = reader.chapter() {
                println!("{}  {}", chapter.title(), chapter.name_arabic);
                println!("{}\n", reader.pagination.summary());
            }
            if should_show(surah) {
                let invocation = match api.invocation().await {
                    Ok(response) => Invocation::from_response(response),
                    Err(e) => {
                        tracing::warn!(error = %e, "Invocation request failed, using built-in record");
                        Invocation::builtin(config.reciter)
                    }
                };
                println!("{}\n{}\n", invocation.text, invocation.translation);
            }
            for (_, verse) in reader.page_verses() {
                println!("{:>3}. {}", verse.number, verse.text);
                println!("     {}\n", verse.english_or_placeholder());
            }
        }
        Commands::Audio { surah, ayah, word } => {
            if ayah == 0 {
                bail!("Please enter a valid ayah number");
            }
            match word {
                Some(0) => bail!("Word indices start at 1"),
                Some(word) => println!("{}", word_audio_url(surah, ayah, word)),
                None => {
                    println!("{}", verse_audio_url(&config.verse_audio_base_url, surah, ayah));
                    println!("{}", fallback_verse_audio_url(surah, ayah));
                }
            }
        }
        Commands::Word { surah, ayah, word } => {
            let chapter = api
                .chapter(surah)
                .await
                .with_context(|| format!("Cannot load surah {}", surah))?;
            let Some(verse) = chapter.position_of(ayah).and_then(|i| chapter.verse(i)) else {
                bail!("Ayah {} not found in this surah", ayah);
            };
            let word_ref = WordRef {
                verse_id: verse.id,
                surah,
                ayah,
                word,
                audio_url: Some(verse.word_audio_url(word)),
            };
            let Some(detail) = resolve_word(&api, &word_ref, &verse.rendered_text()).await else {
                bail!("Word {} not found in {}:{}", word, surah, ayah);
            };
            println!("{}", detail.arabic);
            println!("Transliteration: {}", detail.transliteration);
            println!("Meaning:         {}", detail.meaning);
            println!("Root:            {}", detail.root);
            println!("Audio:           {}", detail.audio_url);
        }
        Commands::Bookmark { verse_id } => match api.bookmark(verse_id, BookmarkKind::Default).await {
            Ok(()) => println!("Verse bookmarked!"),
            Err(e) if e.requires_login() => bail!("Please login to bookmark verses"),
            Err(e) => return Err(e).context("Could not bookmark verse"),
        },
    }

    Ok(())
}
