use libsubtlext::prelude::*;

fn main() {
    let subtle = Subtle::connect(None).unwrap();
    println!("Subtle Information");
    println!("-----------------------------------------------------------------------");
    println!("Display:           {}", subtle.display_name());
    println!("Default Screen:    {}", subtle.screen());
    println!("Version:           {}", control::version(&subtle).unwrap().unwrap_or("not running".to_owned()));
    println!("Root Window:       {:#x}", subtle.root());
    println!("Screens:           {}", Screen::list(&subtle).unwrap().len());
    println!("Views:             {}", View::list(&subtle).unwrap().len());
    println!("Tags:              {}", Tag::list(&subtle).unwrap().len());
    println!("Clients:           {}", Client::list(&subtle).unwrap().len());
    println!();
    println!("Current Client");
    println!("{:-<100}", "");

    println!("{:<10} {:<4} {:<20} {:<12} {:<16} {:<16} {}", "ID", "GRAV", "GEOMETRY", "FLAGS", "INSTANCE", "CLASS", "NAME");
    if let Ok(client) = Client::current(&subtle) {
        let gravity = client.gravity.map(|x| x.to_string()).unwrap_or("-".to_owned());
        println!("{:<10} {:<4} {:<20} {:<12} {:<16} {:<16} {}",
            format!("{:#x}", client.win), gravity, client.geometry.to_string(),
            client.flags.to_string(), client.instance, client.class, client.name);
    }
}
